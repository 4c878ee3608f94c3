/// Messages posted to the GTK thread from background services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ConfigReload,
}
