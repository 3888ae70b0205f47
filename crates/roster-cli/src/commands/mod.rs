pub mod locale;
pub mod roster;
pub mod session;
pub mod starts;

use anyhow::{Result, bail};
use roster_application::{Authorized, CacheOutcome};
use serde::Serialize;

const SESSION_ENDED: &str = "Session expired, run `roster login` again";

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn ensure_session(outcome: CacheOutcome) -> Result<()> {
    match outcome {
        CacheOutcome::Updated => Ok(()),
        CacheOutcome::SessionEnded => bail!(SESSION_ENDED),
        CacheOutcome::Stale => bail!("Session changed while loading, try again"),
    }
}

fn unwrap_authorized<T>(result: Authorized<T>) -> Result<T> {
    match result.into_option() {
        Some(value) => Ok(value),
        None => bail!(SESSION_ENDED),
    }
}
