//! Sequential step execution for a single package

use crate::action::{Action, ActionResult};
use crate::domain::Package;
use tracing::debug;

/// Run `actions` against `pkg` in order, handing every result to `emit`
/// before the next step starts.
///
/// The first result that is not a success (skipped or failed) stops the
/// pipeline. Returning marks the pipeline as finished.
pub async fn run_pipeline<E>(pkg: &mut Package, actions: &[Box<dyn Action>], mut emit: E)
where
    E: FnMut(ActionResult),
{
    for action in actions {
        let result = action.execute(pkg).await;
        let halt = !result.is_success();
        if halt {
            debug!("{}: pipeline stopped ({:?})", pkg.name(), result.status());
        }
        emit(result);
        if halt {
            break;
        }
    }
}
