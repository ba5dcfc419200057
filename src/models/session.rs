//! One exploration session: the root CIDR text plus its view state.

use super::subnet::{parse_cidr, Subnet};
use super::view_state::{ViewState, DEFAULT_MAX_DEPTH};
use crate::errors::ParseError;

/// Root CIDR shown when nothing has been entered yet.
pub const DEFAULT_CIDR: &str = "10.0.0.0/16";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Root CIDR as typed; may be invalid until parsed.
    pub input: String,
    pub view: ViewState,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            input: DEFAULT_CIDR.to_string(),
            view: ViewState::new(DEFAULT_MAX_DEPTH),
        }
    }
}

impl Session {
    pub fn root(&self) -> Result<Subnet, ParseError> {
        parse_cidr(&self.input)
    }

    pub fn max_mask(&self) -> u8 {
        self.view.max_depth
    }

    /// Forget everything and start over from the defaults.
    pub fn reset(&mut self) {
        *self = Session::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session() {
        let session = Session::default();
        assert_eq!(session.root().unwrap().cidr(), "10.0.0.0/16");
        assert_eq!(session.max_mask(), 24);
    }

    #[test]
    fn test_reset() {
        let mut session = Session {
            input: "192.168.0.0/24".to_string(),
            view: ViewState::new(30),
        };
        session.view.toggle_lock("192.168.0.0/25");
        session.reset();
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_invalid_root() {
        let session = Session {
            input: "nonsense".to_string(),
            view: ViewState::default(),
        };
        assert!(session.root().is_err());
    }
}
