//! Single-selection state machine over routes and reports.
//!
//! Flat machine with three states: nothing selected, one route selected,
//! or one report selected. Selecting one kind clears the other, tapping
//! the selected entity again deselects it, and background taps or an
//! explicit close always return to `None`.

/// Current map selection. At most one entity is selected at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    /// A destination route, by index into the destinations vector.
    Route(usize),
    /// A report, by its id.
    Report(String),
}

impl Selection {
    /// Tap on the destination marker at `index`: toggle it, clearing any
    /// selected report.
    pub fn tap_route(&mut self, index: usize) {
        *self = match self {
            Selection::Route(i) if *i == index => Selection::None,
            _ => Selection::Route(index),
        };
    }

    /// Tap on a report marker: toggle it, clearing any selected route.
    pub fn tap_report(&mut self, id: &str) {
        *self = match self {
            Selection::Report(r) if r == id => Selection::None,
            _ => Selection::Report(id.to_string()),
        };
    }

    /// Tap on the map background (no entity hit): clear unconditionally.
    pub fn tap_background(&mut self) {
        *self = Selection::None;
    }

    /// Explicit close action from the inspector panel.
    pub fn close(&mut self) {
        *self = Selection::None;
    }

    pub fn selected_route(&self) -> Option<usize> {
        match self {
            Selection::Route(i) => Some(*i),
            _ => None,
        }
    }

    pub fn selected_report(&self) -> Option<&str> {
        match self {
            Selection::Report(id) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_tap_toggles() {
        let mut s = Selection::default();
        s.tap_route(3);
        assert_eq!(s, Selection::Route(3));
        s.tap_route(3);
        assert_eq!(s, Selection::None);
    }

    #[test]
    fn tapping_another_route_switches() {
        let mut s = Selection::Route(1);
        s.tap_route(2);
        assert_eq!(s, Selection::Route(2));
    }

    #[test]
    fn report_tap_toggles() {
        let mut s = Selection::default();
        s.tap_report("r9");
        assert_eq!(s.selected_report(), Some("r9"));
        s.tap_report("r9");
        assert_eq!(s, Selection::None);
    }

    #[test]
    fn mutual_exclusion_between_kinds() {
        let mut s = Selection::default();
        s.tap_route(0);
        s.tap_report("r1");
        assert_eq!(s.selected_route(), None);
        assert_eq!(s.selected_report(), Some("r1"));
        s.tap_route(4);
        assert_eq!(s.selected_report(), None);
        assert_eq!(s.selected_route(), Some(4));
    }

    #[test]
    fn arbitrary_tap_sequences_keep_at_most_one_selection() {
        // A scripted sequence mixing every event kind; after each step at
        // most one of route/report is selected.
        let mut s = Selection::default();
        let steps: &[&dyn Fn(&mut Selection)] = &[
            &|s| s.tap_route(0),
            &|s| s.tap_report("a"),
            &|s| s.tap_report("a"),
            &|s| s.tap_route(1),
            &|s| s.tap_route(1),
            &|s| s.tap_report("b"),
            &|s| s.tap_background(),
            &|s| s.tap_route(2),
            &|s| s.close(),
        ];
        for step in steps {
            step(&mut s);
            assert!(!(s.selected_route().is_some() && s.selected_report().is_some()));
        }
        assert_eq!(s, Selection::None);
    }

    #[test]
    fn background_and_close_clear_everything() {
        let mut s = Selection::Route(7);
        s.tap_background();
        assert_eq!(s, Selection::None);

        let mut s = Selection::Report("x".into());
        s.close();
        assert_eq!(s, Selection::None);
    }
}
