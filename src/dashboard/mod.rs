mod app;
mod client;
mod controls;
mod fallback;
mod notice;
mod plan;
mod surface;

pub use app::Dashboard;
pub use client::ReportClient;
pub use controls::ControlId;
pub use surface::TerminalSurface;
