use strum::IntoStaticStr;

use super::Asset;

/// Change notification delivered to listeners of one catalog context.
/// Carries no contract beyond "something changed", except that adding an
/// asset attaches the new record.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum CatalogEvent {
    AssetsUpdated(Option<Asset>),
    AlbumsUpdated,
}

impl CatalogEvent {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}
