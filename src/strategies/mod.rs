pub mod dump;
pub mod export;
pub mod plan;

pub use dump::{DumpStrategy, DumpTool};
pub use export::ExportStrategy;
pub use plan::{CommandPlan, Invocation, StagedExport};

use crate::config::{BackupJob, DatabaseType, ExecutionMethod};
use crate::error::BackupError;
use crate::utils::executor::CommandExecutor;

/// Trait for backup strategies
pub trait BackupStrategy {
    /// Build the command plan for a job, without side effects
    fn build(&self, job: &BackupJob) -> Result<CommandPlan, BackupError>;

    /// Run a plan built by this strategy
    fn execute(&self, plan: &CommandPlan, executor: &dyn CommandExecutor) -> Result<(), BackupError> {
        plan.execute(executor)
    }

    /// Get strategy name (for logging)
    fn name(&self) -> &'static str;
}

/// Strategy for one cell of the type × method matrix
pub fn strategy_for(db_type: DatabaseType, method: ExecutionMethod) -> Box<dyn BackupStrategy> {
    match (db_type, method) {
        (DatabaseType::Postgres, method) => Box::new(DumpStrategy::new(DumpTool::PgDump, method)),
        (DatabaseType::Mysql, method) => Box::new(DumpStrategy::new(DumpTool::MysqlDump, method)),
        (DatabaseType::Mariadb, method) => {
            Box::new(DumpStrategy::new(DumpTool::MariadbDump, method))
        }
        (DatabaseType::Mongodb, method) => Box::new(ExportStrategy::new(method)),
    }
}

/// Parse the job's type and method and pick its strategy
pub fn resolve(job: &BackupJob) -> Result<(DatabaseType, Box<dyn BackupStrategy>), BackupError> {
    let db_type = job.database_type()?;
    let method = job.execution_method()?;
    job.check_credentials()?;
    Ok((db_type, strategy_for(db_type, method)))
}

/// Build the plan for a job in one step
pub fn build_plan(job: &BackupJob) -> Result<CommandPlan, BackupError> {
    let (_, strategy) = resolve(job)?;
    strategy.build(job)
}
