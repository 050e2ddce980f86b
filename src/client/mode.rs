use crate::message::MessageContext;

/// Operating mode of the client. The mode decides whether a call is taken
/// at all and how loudly the pipeline reports what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMode {
    Service,
    /// Only the developer is served
    Idle,
    /// Every call, termination and completion is logged
    Debug,
}

impl ClientMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "service" => Some(ClientMode::Service),
            "idle" => Some(ClientMode::Idle),
            "debug" => Some(ClientMode::Debug),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClientMode::Service => "SERVICE",
            ClientMode::Idle => "IDLE",
            ClientMode::Debug => "DEBUG",
        }
    }

    pub fn check_call(&self, is_dev: bool) -> bool {
        match self {
            ClientMode::Idle => is_dev,
            _ => true,
        }
    }

    pub(super) fn on_call(&self, ctx: &MessageContext, fullname: &str) {
        if *self == ClientMode::Debug {
            log::info!(
                "Call to {} by {} ({}) in channel {}",
                fullname,
                ctx.author.name,
                ctx.author.id,
                ctx.channel_id
            );
        }
    }

    pub(super) fn on_terminated(&self, fullname: &str, reason: &str) {
        if *self == ClientMode::Debug {
            log::info!("Terminated {}: {}", fullname, reason);
        }
    }

    pub(super) fn on_completed(&self, fullname: &str) {
        if *self == ClientMode::Debug {
            log::info!("Completed {}", fullname);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(ClientMode::from_str("idle"), Some(ClientMode::Idle));
        assert_eq!(ClientMode::from_str(" DEBUG "), Some(ClientMode::Debug));
        assert_eq!(ClientMode::from_str("Service"), Some(ClientMode::Service));
        assert_eq!(ClientMode::from_str("sleep"), None);
    }

    #[test]
    fn test_idle_only_serves_developer() {
        assert!(ClientMode::Idle.check_call(true));
        assert!(!ClientMode::Idle.check_call(false));
        assert!(ClientMode::Service.check_call(false));
        assert!(ClientMode::Debug.check_call(false));
    }
}
