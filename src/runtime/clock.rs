//! Wall clock.

use chrono::{DateTime, Utc};

use super::RealRuntime;

impl RealRuntime {
    pub(crate) fn now_impl(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};

    #[test]
    fn test_real_runtime_now_returns_current_time() {
        let runtime = RealRuntime;
        let first = runtime.now();
        let second = runtime.now();
        assert!(second >= first);
        assert!(first.timestamp() > 1_600_000_000);
    }
}
