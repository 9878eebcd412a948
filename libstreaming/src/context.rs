use std::io::Write;

use serde_json;

use env::{EnvReader, Environment};
use errors::*;

pub const MAP_TASKS_VAR: &str = "mapred_map_tasks";
pub const REDUCE_TASKS_VAR: &str = "mapred_reduce_tasks";
pub const JOB_ID_VAR: &str = "mapred_job_id";
/// Only set when the process runs as a task scheduled by Hadoop.
pub const TASK_ID_VAR: &str = "mapred_task_id";
pub const INPUT_FILE_VAR: &str = "map_input_file";
pub const WORK_OUTPUT_DIR_VAR: &str = "mapred_work_output_dir";
pub const WORKING_DIR_VAR: &str = "mapred_working_dir";
pub const DEFAULT_FS_VAR: &str = "fs_default_name";

/// `JobContext` is a snapshot of the job variables Hadoop Streaming exports to a task.
///
/// Every field is always populated: numbers default to 0 and strings to the empty string when
/// the variable is missing or unparsable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct JobContext {
    map_tasks_num: i64,
    reduce_tasks_num: i64,
    job_id: String,
    task_id: String,
    input_file_path: String,
    work_output_dir: String,
    working_dir: String,
    default_filesystem_uri: String,
}

impl JobContext {
    /// Builds the context from `env`, writing one diagnostic line per variable to stderr.
    pub fn from_env(env: &Environment) -> Self {
        JobContext::read(&mut EnvReader::stderr(env))
    }

    /// Builds the context through `reader`. Variables are read in declaration order.
    pub fn read<W: Write>(reader: &mut EnvReader<W>) -> Self {
        JobContext {
            map_tasks_num: reader.read_int(MAP_TASKS_VAR, 0).into_value(),
            reduce_tasks_num: reader.read_int(REDUCE_TASKS_VAR, 0).into_value(),
            job_id: reader.read_string(JOB_ID_VAR, "").into_value(),
            task_id: reader.read_string(TASK_ID_VAR, "").into_value(),
            input_file_path: reader.read_string(INPUT_FILE_VAR, "").into_value(),
            work_output_dir: reader.read_string(WORK_OUTPUT_DIR_VAR, "").into_value(),
            working_dir: reader.read_string(WORKING_DIR_VAR, "").into_value(),
            default_filesystem_uri: reader.read_string(DEFAULT_FS_VAR, "").into_value(),
        }
    }

    pub fn map_tasks_num(&self) -> i64 {
        self.map_tasks_num
    }

    pub fn reduce_tasks_num(&self) -> i64 {
        self.reduce_tasks_num
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn input_file_path(&self) -> &str {
        &self.input_file_path
    }

    pub fn work_output_dir(&self) -> &str {
        &self.work_output_dir
    }

    pub fn working_dir(&self) -> &str {
        &self.working_dir
    }

    pub fn default_filesystem_uri(&self) -> &str {
        &self.default_filesystem_uri
    }

    pub fn is_running_under_scheduler(&self) -> bool {
        !self.task_id.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string(self).chain_err(|| "Error serialising job context.")?;
        Ok(json)
    }
}
