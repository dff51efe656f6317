use std::time::{Duration, Instant};

pub const NOTICE_VISIBLE: Duration = Duration::from_secs(3);
pub const NOTICE_EXIT: Duration = Duration::from_millis(300);

pub const UPDATE_OK: &str = "Scores updated successfully!";
pub const UPDATE_FAILED: &str = "Failed to update scores. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    /// Background colour: `#4caf50` for success, `#f44336` for errors.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            NoticeKind::Success => (0x4c, 0xaf, 0x50),
            NoticeKind::Error => (0xf4, 0x43, 0x36),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    Leaving,
    Gone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
    pub shown_at: Instant,
}

impl Notice {
    pub fn phase(&self, now: Instant) -> Phase {
        let age = now.saturating_duration_since(self.shown_at);
        if age < NOTICE_VISIBLE {
            Phase::Visible
        } else if age < NOTICE_VISIBLE + NOTICE_EXIT {
            Phase::Leaving
        } else {
            Phase::Gone
        }
    }
}

/// Stack of transient notices, oldest first. Duplicates are allowed.
#[derive(Debug, Default)]
pub struct NoticeTray {
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeTray {
    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>, now: Instant) -> Notice {
        self.next_id += 1;
        let notice = Notice {
            id: self.next_id,
            kind,
            message: message.into(),
            shown_at: now,
        };
        self.notices.push(notice.clone());
        notice
    }

    /// Drops notices whose exit transition has finished and returns them.
    pub fn sweep(&mut self, now: Instant) -> Vec<Notice> {
        let (gone, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut self.notices)
            .into_iter()
            .partition(|n| n.phase(now) == Phase::Gone);
        self.notices = keep;
        gone
    }

    pub fn active(&self) -> &[Notice] {
        &self.notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_lifecycle_follows_fixed_delays() {
        let t0 = Instant::now();
        let mut tray = NoticeTray::default();
        let n = tray.push(NoticeKind::Success, UPDATE_OK, t0);

        assert_eq!(n.phase(t0), Phase::Visible);
        assert_eq!(n.phase(t0 + Duration::from_millis(2999)), Phase::Visible);
        assert_eq!(n.phase(t0 + NOTICE_VISIBLE), Phase::Leaving);
        assert_eq!(n.phase(t0 + Duration::from_millis(3299)), Phase::Leaving);
        assert_eq!(n.phase(t0 + Duration::from_millis(3300)), Phase::Gone);

        assert!(tray.sweep(t0 + Duration::from_millis(3100)).is_empty());
        let gone = tray.sweep(t0 + Duration::from_secs(4));
        assert_eq!(gone.len(), 1);
        assert!(tray.active().is_empty());
    }

    #[test]
    fn notices_stack_without_dedup() {
        let t0 = Instant::now();
        let mut tray = NoticeTray::default();
        tray.push(NoticeKind::Error, UPDATE_FAILED, t0);
        tray.push(NoticeKind::Error, UPDATE_FAILED, t0 + Duration::from_secs(1));
        tray.push(NoticeKind::Success, UPDATE_OK, t0 + Duration::from_secs(2));
        assert_eq!(tray.active().len(), 3);

        let gone = tray.sweep(t0 + Duration::from_millis(4400));
        assert_eq!(gone.len(), 2);
        assert_eq!(tray.active()[0].kind, NoticeKind::Success);
        assert!(tray.active()[0].id > gone[1].id);
    }

    #[test]
    fn colors_by_kind() {
        assert_eq!(NoticeKind::Success.rgb(), (76, 175, 80));
        assert_eq!(NoticeKind::Error.rgb(), (244, 67, 54));
    }
}
