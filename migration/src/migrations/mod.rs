pub mod m202601120001_create_nodes;
pub mod m202601120002_create_metric_samples;
pub mod m202601120003_create_live_metric_samples;
pub mod m202601120004_create_process_snapshots;
pub mod m202601120005_create_service_snapshots;
pub mod m202601120006_create_alerts;
pub mod m202601120007_create_notifications;
pub mod m202601120008_create_pending_configs;
pub mod m202601120009_create_settings;
