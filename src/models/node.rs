//! Node and time window types.

use serde::{Deserialize, Serialize};

/// An arrival time window `[earliest, latest]` at a node.
///
/// A vehicle may arrive before `earliest` and wait (bounded by the Time
/// dimension's slack), but must never start service after `latest`.
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::TimeWindow;
///
/// let tw = TimeWindow::new(5, 10).unwrap();
/// assert!(tw.contains(7));
/// assert!(!tw.contains(11));
/// assert_eq!(tw.waiting_time(2), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    earliest: i64,
    latest: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `earliest > latest`.
    pub fn new(earliest: i64, latest: i64) -> Option<Self> {
        if earliest > latest {
            return None;
        }
        Some(Self { earliest, latest })
    }

    /// Earliest allowable arrival.
    pub fn earliest(&self) -> i64 {
        self.earliest
    }

    /// Latest allowable arrival.
    pub fn latest(&self) -> i64 {
        self.latest
    }

    /// Returns `true` if `time` falls within this window.
    pub fn contains(&self, time: i64) -> bool {
        time >= self.earliest && time <= self.latest
    }

    /// Waiting needed when arriving at `arrival`; zero if not early.
    pub fn waiting_time(&self, arrival: i64) -> i64 {
        (self.earliest - arrival).max(0)
    }
}

/// A location in a routing problem. Node 0 is conventionally the depot.
///
/// # Examples
///
/// ```
/// use u_cvrptw::models::{Node, TimeWindow};
///
/// let n = Node::new(3, 12).with_time_window(TimeWindow::new(0, 50).unwrap());
/// assert_eq!(n.id(), 3);
/// assert_eq!(n.demand(), 12);
/// assert!(n.time_window().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: usize,
    demand: i64,
    time_window: Option<TimeWindow>,
}

impl Node {
    /// Creates a node with the given demand and no time window.
    pub fn new(id: usize, demand: i64) -> Self {
        Self {
            id,
            demand,
            time_window: None,
        }
    }

    /// Creates a depot node (zero demand).
    pub fn depot(id: usize) -> Self {
        Self::new(id, 0)
    }

    /// Sets the time window of this node.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Node index.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Demand picked up or delivered at this node.
    pub fn demand(&self) -> i64 {
        self.demand
    }

    /// Time window, if any.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(10, 5).is_none());
        assert!(TimeWindow::new(5, 5).is_some());
    }

    #[test]
    fn test_time_window_contains() {
        let tw = TimeWindow::new(5, 10).expect("valid");
        assert!(tw.contains(5));
        assert!(tw.contains(10));
        assert!(!tw.contains(4));
        assert!(!tw.contains(11));
    }

    #[test]
    fn test_time_window_waiting() {
        let tw = TimeWindow::new(5, 10).expect("valid");
        assert_eq!(tw.waiting_time(3), 2);
        assert_eq!(tw.waiting_time(5), 0);
        assert_eq!(tw.waiting_time(8), 0);
    }

    #[test]
    fn test_depot() {
        let d = Node::depot(0);
        assert_eq!(d.id(), 0);
        assert_eq!(d.demand(), 0);
        assert!(d.time_window().is_none());
    }
}
