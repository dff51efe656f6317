use std::io::Write;

use owo_colors::{OwoColorize, Style};

use super::controls::ControlId;
use super::notice::{Notice, NoticeKind, Phase};
use super::plan::{RenderPlan, MAX_SCORE};

/// Effect layer: applies computed state to whatever is showing the dashboard.
pub trait Surface {
    fn apply(&mut self, plan: &RenderPlan);
    fn control_changed(&mut self, control: ControlId, value: i64);
    fn notify(&mut self, notice: &Notice, phase: Phase);
    fn dismiss(&mut self, notice: &Notice);
}

/// Plain-text dashboard on any writer. Write errors are ignored; there is
/// nowhere better to report them.
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        TerminalSurface { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, plan: &RenderPlan) -> std::io::Result<()> {
        let out = &mut self.out;
        if let Some(student) = &plan.student {
            writeln!(out, "== {} ==", student.name)?;
            writeln!(out, "Test date: {}", student.test_date)?;
            writeln!(out, "Test type: {}", student.test_type)?;
        }
        writeln!(out, "Overall score: {} / {}", plan.overall.score, MAX_SCORE)?;
        writeln!(out)?;

        for card in &plan.skill_cards {
            writeln!(out, "[{}] {}  {}", card.icon, card.name, card.score_text)?;
            writeln!(out, "    {}", card.description)?;
            writeln!(
                out,
                "    {} {:.0}%  {}",
                bar(card.score.as_number(), MAX_SCORE, 18),
                card.progress_percent,
                card.level
            )?;
        }
        writeln!(out)?;

        writeln!(out, "{} ({})", plan.feedback.title, plan.feedback.badge)?;
        writeln!(out, "{}", plan.feedback.description)?;
        for s in &plan.feedback.suggestions {
            writeln!(out, "  - {s}")?;
        }
        writeln!(out)?;

        writeln!(out, "{}", plan.chart.dataset_label)?;
        for (i, raw) in plan.chart.data.iter().enumerate() {
            let tip = plan.chart.tooltip(i).unwrap_or_default();
            let width = plan.chart.scale_max.max(1) as usize;
            writeln!(
                out,
                "  {:<14} {}  {}",
                plan.chart.labels[i],
                bar(raw.as_number(), plan.chart.scale_max, width),
                tip
            )?;
        }

        writeln!(
            out,
            "Controls: overall={} pronunciation={} fluency={}",
            plan.overall.value_label, plan.controls.pronunciation, plan.controls.fluency
        )?;
        if let Some(date) = &plan.footer_date {
            writeln!(out, "Report generated {date}")?;
        }
        out.flush()
    }
}

fn bar(value: f64, max: i64, width: usize) -> String {
    let max = max.max(1) as f64;
    let filled = if value.is_nan() {
        0
    } else {
        ((value.clamp(0.0, max) * width as f64) / max).floor() as usize
    };
    let filled = filled.min(width);
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

fn notice_style(kind: NoticeKind) -> Style {
    let (r, g, b) = kind.rgb();
    Style::new().white().on_truecolor(r, g, b)
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn apply(&mut self, plan: &RenderPlan) {
        let _ = self.draw(plan);
    }

    fn control_changed(&mut self, control: ControlId, value: i64) {
        let _ = writeln!(self.out, "{} = {}", control.name(), value);
        let _ = self.out.flush();
    }

    fn notify(&mut self, notice: &Notice, phase: Phase) {
        let tag = match notice.kind {
            NoticeKind::Success => "OK",
            NoticeKind::Error => "ERROR",
        };
        let line = match phase {
            Phase::Visible => format!("[{tag}] {}", notice.message),
            Phase::Leaving => format!("[{tag}] {} (closing)", notice.message),
            Phase::Gone => return,
        };
        let _ = writeln!(self.out, "{}", line.style(notice_style(notice.kind)));
        let _ = self.out.flush();
    }

    fn dismiss(&mut self, notice: &Notice) {
        let _ = writeln!(self.out, "[gone] {}", notice.message);
        let _ = self.out.flush();
    }
}
