use crate::app_context::AppContext;

mod config_reload;
mod dashboard_export;
mod schedules;

pub fn start_background_jobs(app_context: AppContext) {
    config_reload::start_config_hot_reload_job(app_context.clone());

    if let Some(journal) = app_context.journal.clone() {
        schedules::start_maintenance_job(journal);
    }

    if let Some(path) = app_context.config.dashboard.snapshot_path.clone() {
        dashboard_export::start_dashboard_export_job(app_context.publisher.subscribe(), path);
    }
}
