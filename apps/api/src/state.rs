use marquee_application::{AccessService, CatalogService, DirectoryService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_service: AccessService,
    pub catalog_service: CatalogService,
    pub directory_service: DirectoryService,
}
