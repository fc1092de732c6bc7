use std::time::Duration;

use crate::shared::frame::Frame;
use crate::shared::DynError;

/// A key the user pressed while the display had focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPress {
    Escape,
    Char(char),
}

impl KeyPress {
    /// Escape, `q` and `Q` end a live session.
    pub fn is_exit(&self) -> bool {
        matches!(self, KeyPress::Escape | KeyPress::Char('q' | 'Q'))
    }
}

/// An on-screen sink for annotated frames.
///
/// Not `Send`: windowing backends are bound to the thread that created them.
pub trait FrameDisplay {
    fn open(&mut self, title: &str) -> Result<(), DynError>;

    fn show(&mut self, frame: &Frame) -> Result<(), DynError>;

    /// Services pending UI events for at most `timeout` and returns the
    /// first key pressed, if any.
    fn poll_key(&mut self, timeout: Duration) -> Option<KeyPress>;

    /// False once the window was closed by the user or by `close`.
    fn is_open(&self) -> bool;

    /// Safe to call more than once.
    fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::escape(KeyPress::Escape, true)]
    #[case::lower_q(KeyPress::Char('q'), true)]
    #[case::upper_q(KeyPress::Char('Q'), true)]
    #[case::other_letter(KeyPress::Char('w'), false)]
    #[case::space(KeyPress::Char(' '), false)]
    fn test_exit_keys(#[case] key: KeyPress, #[case] expected: bool) {
        assert_eq!(key.is_exit(), expected);
    }
}
