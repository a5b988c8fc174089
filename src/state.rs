//! Shared application state for cake routes.

use crate::service::CakeService;

#[derive(Clone)]
pub struct AppState {
    pub cakes: CakeService,
}
