//! Floor Plan Application
//!
//! Headless host for the floor-plan editor: loads configuration, opens the
//! tenant's plans from disk, replays scripted input and reports the result.

mod config;
mod replay;

pub use config::{AppConfig, AppError, Dashboard};
pub use replay::{HeadlessDisplay, LAST_ZONE, ReplayReport, Replayer, Step, load_script};

use floorplan_core::{Editor, FileStorage, FloorSession, PersistenceGateway};
use std::sync::Arc;

/// Open the configured tenant, replay `steps`, and log a per-floor summary.
pub fn run(config: &AppConfig, steps: &[Step]) -> Result<ReplayReport, AppError> {
    let storage = Arc::new(FileStorage::new(config.storage_dir()?)?);
    log::info!("Using storage at {}", storage.base_path().display());

    let session = pollster::block_on(FloorSession::open(storage, &config.tenant))?;
    let mut editor = Editor::new(session, config.container_size());
    if let Some(path) = &config.dashboard {
        let dashboard = Dashboard::load(path)?;
        editor.set_dashboard(dashboard.assets, dashboard.calls);
    }
    editor.select_floor(&config.initial_floor);
    editor.zoom_to_fit();
    if config.edit_on_start {
        editor.start_editing();
    }

    let display = HeadlessDisplay {
        allow: config.allow_fullscreen,
    };
    let mut replayer = Replayer::new(editor, display);
    replayer.run(steps);
    let (editor, report) = replayer.into_parts();

    log_summary(&editor, &report);
    Ok(report)
}

fn log_summary<S: PersistenceGateway + 'static>(editor: &Editor<S>, report: &ReplayReport) {
    log::info!(
        "Replayed {} step(s): {} commit(s), {} rejected, {} save(s) ({} failed)",
        report.steps,
        report.commits,
        report.rejected,
        report.saves,
        report.failed_saves
    );
    for (id, plan) in editor.session().plans() {
        log::info!(
            "Floor {} ({}): {} zone(s), {} placed asset(s)",
            id,
            plan.name,
            plan.zones.len(),
            plan.asset_positions.len()
        );
        for zone in &plan.zones {
            log::info!(
                "  {} {} [{}] at ({:.1}, {:.1}) {:.1}x{:.1}, {} asset(s)",
                zone.zone_type.icon(),
                zone.name,
                zone.zone_type,
                zone.x,
                zone.y,
                zone.width,
                zone.height,
                plan.assets_in_zone(&zone.id).count()
            );
        }
    }
    for marker in editor.markers() {
        if marker.emphasis.pulses() {
            log::warn!("Asset {} has open calls: {:?}", marker.asset_id, marker.emphasis);
        }
    }
    if editor.session().is_dirty() {
        log::warn!("Unsaved changes remain for tenant {}", editor.session().tenant());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::ZoneType;
    use std::fs;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            tenant: "acme".to_string(),
            storage_dir: Some(dir.to_path_buf()),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_run_persists_between_invocations() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());

        let steps = vec![
            Step::CreateZone {
                name: "Boiler room".to_string(),
                zone_type: ZoneType::Utility,
                opacity: 60.0,
            },
            Step::MoveAsset {
                id: "boiler".to_string(),
                x: 15.0,
                y: 15.0,
            },
            Step::Save,
        ];
        let report = run(&config, &steps).unwrap();
        assert_eq!(report.saves, 1);
        assert_eq!(report.failed_saves, 0);
        assert!(dir.path().join("acme.json").exists());

        let steps = vec![Step::SelectZone {
            id: "Boiler room".to_string(),
        }];
        let report = run(&config, &steps).unwrap();
        assert_eq!(report.rejected, 0);
    }

    #[test]
    fn test_run_without_save_leaves_disk_untouched() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        let steps = vec![Step::CreateZone {
            name: "Temp".to_string(),
            zone_type: ZoneType::Office,
            opacity: 70.0,
        }];

        run(&config, &steps).unwrap();
        assert!(!dir.path().join("acme.json").exists());
    }

    #[test]
    fn test_run_rejects_bad_dashboard() {
        let dir = tempdir().unwrap();
        let dashboard = dir.path().join("dashboard.json");
        fs::write(&dashboard, "{ broken").unwrap();
        let config = AppConfig {
            dashboard: Some(dashboard),
            ..config(dir.path())
        };

        assert!(matches!(run(&config, &[]), Err(AppError::Dashboard { .. })));
    }
}
