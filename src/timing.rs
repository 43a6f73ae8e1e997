//! Timestamp-based rate limiting for input and resize handlers

/// Lets at most one call through per interval
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// True if a call at `now` should run
    pub fn ready(&mut self, now: f64) -> bool {
        match self.last_ms {
            Some(last) if now - last < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now);
                true
            }
        }
    }
}

/// Fires once, `delay_ms` after the last poke
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    delay_ms: f64,
    due_ms: Option<f64>,
}

impl Debounce {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            due_ms: None,
        }
    }

    pub fn poke(&mut self, now: f64) {
        self.due_ms = Some(now + self.delay_ms);
    }

    /// True exactly once when the quiet period has passed
    pub fn fire(&mut self, now: f64) -> bool {
        match self.due_ms {
            Some(due) if now >= due => {
                self.due_ms = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle() {
        let mut throttle = Throttle::new(16.0);
        assert!(throttle.ready(0.0));
        assert!(!throttle.ready(10.0));
        assert!(throttle.ready(16.0));
        assert!(!throttle.ready(31.0));
        assert!(throttle.ready(40.0));
    }

    #[test]
    fn test_debounce_waits_for_quiet() {
        let mut debounce = Debounce::new(250.0);
        assert!(!debounce.fire(1000.0));
        debounce.poke(0.0);
        debounce.poke(200.0);
        assert!(!debounce.fire(300.0));
        assert!(debounce.fire(450.0));
        assert!(!debounce.fire(500.0));
        assert!(!debounce.fire(10_000.0));
    }
}
