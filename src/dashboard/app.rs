use std::time::Instant;

use chrono::{Local, NaiveDate};
use tracing::{error, warn};

use crate::report::Record;

use super::client::ReportClient;
use super::controls::{ControlId, Controls};
use super::fallback::{fallback_record, FALLBACK_NOTICE};
use super::notice::{NoticeKind, NoticeTray, Phase, UPDATE_FAILED, UPDATE_OK};
use super::plan::{build_plan, RenderPlan, Scope};
use super::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Service,
    Fallback,
}

pub struct Dashboard<S: Surface> {
    client: ReportClient,
    surface: S,
    controls: Controls,
    notices: NoticeTray,
    last_plan: Option<RenderPlan>,
}

impl<S: Surface> Dashboard<S> {
    pub fn new(client: ReportClient, surface: S) -> Self {
        Dashboard {
            client,
            surface,
            controls: Controls::default(),
            notices: NoticeTray::default(),
            last_plan: None,
        }
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[cfg(test)]
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    #[cfg(test)]
    pub fn notices(&self) -> &NoticeTray {
        &self.notices
    }

    #[cfg(test)]
    pub fn last_plan(&self) -> Option<&RenderPlan> {
        self.last_plan.as_ref()
    }

    /// First render. A failed fetch (network error, error status, body that is
    /// not a report) renders the demo record instead and says so.
    pub async fn start(&mut self) -> DataSource {
        match self.client.fetch_report().await {
            Ok(record) => {
                self.render(&record, Scope::Full);
                DataSource::Service
            }
            Err(e) => {
                warn!("error loading student data from {}: {e:#}", self.client.base_url());
                self.render(&fallback_record(), Scope::Full);
                self.notify(NoticeKind::Error, FALLBACK_NOTICE);
                DataSource::Fallback
            }
        }
    }

    pub fn set_control(&mut self, id: ControlId, value: i64) -> i64 {
        let v = self.controls.set(id, value);
        self.surface.control_changed(id, v);
        v
    }

    /// Sends the three control values. On failure the previous render stays
    /// untouched and nothing is retried.
    pub async fn confirm(&mut self) -> Option<Record> {
        let update = self.controls.to_update();
        match self.client.update_scores(&update).await {
            Ok(resp) => {
                self.render(&resp.data, Scope::Scores);
                self.notify(NoticeKind::Success, UPDATE_OK);
                Some(resp.data)
            }
            Err(e) => {
                error!("error updating scores: {e:#}");
                self.notify(NoticeKind::Error, UPDATE_FAILED);
                None
            }
        }
    }

    pub fn redraw(&mut self) {
        self.redraw_at(Instant::now());
    }

    /// Redraws the last plan with the sliders where the user left them, then
    /// any notices that are still up, marked if they are on their way out.
    pub fn redraw_at(&mut self, now: Instant) {
        let Some(mut plan) = self.last_plan.clone() else {
            return;
        };
        let overall = self.controls.slider(ControlId::Overall);
        plan.overall.control_value = overall.value();
        plan.overall.value_label = overall.label();
        plan.controls.pronunciation = self.controls.slider(ControlId::Pronunciation).value();
        plan.controls.fluency = self.controls.slider(ControlId::Fluency).value();
        self.surface.apply(&plan);
        for notice in self.notices.active() {
            self.surface.notify(notice, notice.phase(now));
        }
    }

    pub fn sweep_notices(&mut self, now: Instant) {
        for gone in self.notices.sweep(now) {
            self.surface.dismiss(&gone);
        }
    }

    fn render(&mut self, record: &Record, scope: Scope) {
        let plan = build_plan(record, scope, today());
        self.surface.apply(&plan);
        self.controls.sync(&plan);
        self.last_plan = Some(match (scope, self.last_plan.take()) {
            // Panels outside a scores-only plan keep what was last drawn.
            (Scope::Scores, Some(prev)) => RenderPlan {
                student: prev.student,
                footer_date: prev.footer_date,
                ..plan
            },
            _ => plan,
        });
    }

    fn notify(&mut self, kind: NoticeKind, message: &str) {
        let notice = self.notices.push(kind, message, Instant::now());
        self.surface.notify(&notice, Phase::Visible);
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::notice::{Notice, NOTICE_EXIT, NOTICE_VISIBLE};
    use std::time::Duration;

    #[derive(Default)]
    struct Recording {
        plans: Vec<RenderPlan>,
        notices: Vec<Notice>,
        phases: Vec<Phase>,
        dismissed: Vec<Notice>,
        changes: Vec<(ControlId, i64)>,
    }

    impl Surface for Recording {
        fn apply(&mut self, plan: &RenderPlan) {
            self.plans.push(plan.clone());
        }
        fn control_changed(&mut self, control: ControlId, value: i64) {
            self.changes.push((control, value));
        }
        fn notify(&mut self, notice: &Notice, phase: Phase) {
            self.notices.push(notice.clone());
            self.phases.push(phase);
        }
        fn dismiss(&mut self, notice: &Notice) {
            self.dismissed.push(notice.clone());
        }
    }

    // Port 9 (discard) is not served by anything on a test box.
    fn dead_client() -> ReportClient {
        ReportClient::new("http://127.0.0.1:9")
    }

    #[tokio::test]
    async fn unreachable_service_renders_fallback_with_error_notice() {
        let mut dash = Dashboard::new(dead_client(), Recording::default());
        assert_eq!(dash.start().await, DataSource::Fallback);

        let s = dash.surface();
        assert_eq!(s.plans.len(), 1);
        assert_eq!(s.plans[0], build_plan(&fallback_record(), Scope::Full, today()));
        assert_eq!(s.notices.len(), 1);
        assert_eq!(s.notices[0].kind, NoticeKind::Error);
        assert_eq!(s.notices[0].message, FALLBACK_NOTICE);

        assert_eq!(dash.controls().overall.value(), 7);
        assert_eq!(dash.controls().pronunciation.value(), 7);
        assert_eq!(dash.controls().fluency.value(), 6);
    }

    #[tokio::test]
    async fn failed_update_keeps_last_render() {
        let mut dash = Dashboard::new(dead_client(), Recording::default());
        dash.start().await;
        let before = dash.last_plan().cloned();

        assert_eq!(dash.set_control(ControlId::Overall, 9), 9);
        assert!(dash.confirm().await.is_none());

        assert_eq!(dash.last_plan().cloned(), before);
        assert_eq!(dash.surface().plans.len(), 1);
        let last = dash.surface().notices.last().expect("notice");
        assert_eq!(last.message, UPDATE_FAILED);
        assert_eq!(dash.notices().active().len(), 2);
        assert_eq!(dash.surface().changes, vec![(ControlId::Overall, 9)]);
    }

    #[tokio::test]
    async fn redraw_shows_live_slider_values() {
        let mut dash = Dashboard::new(dead_client(), Recording::default());
        dash.start().await;
        dash.set_control(ControlId::Fluency, 2);
        dash.redraw();

        let plan = dash.surface().plans.last().expect("plan");
        assert_eq!(plan.controls.fluency, 2);
        assert_eq!(plan.overall.value_label, "7");
        // The rendered scores themselves do not move until confirmed.
        assert_eq!(plan.skill_cards[1].score, 6);
        assert_eq!(dash.surface().notices.len(), 2);
    }

    #[tokio::test]
    async fn leaving_notice_is_marked_then_dismissed() {
        let mut dash = Dashboard::new(dead_client(), Recording::default());
        dash.start().await;
        let shown_at = dash.notices().active()[0].shown_at;

        dash.redraw_at(shown_at + NOTICE_VISIBLE + Duration::from_millis(100));
        assert_eq!(dash.surface().phases, vec![Phase::Visible, Phase::Leaving]);
        assert!(dash.surface().dismissed.is_empty());

        dash.sweep_notices(shown_at + NOTICE_VISIBLE + NOTICE_EXIT);
        assert_eq!(dash.surface().dismissed.len(), 1);
        assert_eq!(dash.surface().dismissed[0].message, FALLBACK_NOTICE);
        assert!(dash.notices().active().is_empty());
    }
}
