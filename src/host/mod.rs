//! Seam to the building-design host application.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::state::{Config, FunctionArea};
use crate::units::UnitSystem;

pub mod fixture;
pub mod http;

#[async_trait]
pub trait Host: Send + Sync {
    /// Current gross-floor-area breakdown by building function.
    async fn fetch_area_breakdown(&self) -> Result<Vec<FunctionArea>>;
    /// The unit system the host is presenting to the user.
    async fn fetch_unit_system(&self) -> Result<UnitSystem>;
}

#[async_trait]
impl<T: Host + ?Sized> Host for Arc<T> {
    async fn fetch_area_breakdown(&self) -> Result<Vec<FunctionArea>> {
        (**self).fetch_area_breakdown().await
    }

    async fn fetch_unit_system(&self) -> Result<UnitSystem> {
        (**self).fetch_unit_system().await
    }
}

#[derive(Clone, Copy, Debug)]
pub enum HostKind {
    Http,
    Fixture,
}

impl HostKind {
    pub fn from_config(cfg: &Config) -> Self {
        if cfg.host_base.is_some() {
            HostKind::Http
        } else {
            HostKind::Fixture
        }
    }

    pub fn build(self, cfg: &Config) -> Result<Box<dyn Host>> {
        match self {
            HostKind::Http => Ok(Box::new(http::HttpHost::new(cfg)?)),
            HostKind::Fixture => Ok(Box::new(fixture::FixtureHost::default())),
        }
    }
}
