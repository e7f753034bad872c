use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use log::info;

use crate::task::properties;
use crate::task::AbstractTask;
use crate::task::OperatorId;

/// The operators of a plan, in the order in which they are applied.
pub type Plan = Vec<OperatorId>;

/// Writes plans in the format of the IPC validators: one `(operator name)` line per step,
/// followed by a comment with the plan cost.
#[derive(Debug, Clone)]
pub struct PlanWriter {
    path: PathBuf,
}

impl PlanWriter {
    pub fn new(path: impl Into<PathBuf>) -> PlanWriter {
        PlanWriter { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `plan` and return its cost under the operator costs of `task`.
    pub fn save_plan(&self, plan: &[OperatorId], task: &dyn AbstractTask) -> std::io::Result<i32> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        let cost = write_plan(plan, task, &mut writer)?;
        writer.flush()?;

        info!("Plan length: {} step(s).", plan.len());
        info!("Plan cost: {cost}");
        Ok(cost)
    }
}

/// Write `plan` to `sink` and return its cost.
pub fn write_plan(
    plan: &[OperatorId],
    task: &dyn AbstractTask,
    mut sink: impl Write,
) -> std::io::Result<i32> {
    for &op in plan {
        writeln!(sink, "({})", task.operator(op).name)?;
    }

    let cost = properties::plan_cost(task, plan);
    let kind = if properties::is_unit_cost(task) {
        "unit cost"
    } else {
        "general cost"
    };
    writeln!(sink, "; cost = {cost} ({kind})")?;

    Ok(cost)
}
