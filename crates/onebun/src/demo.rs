//! Demo shop application
//!
//! A two-module application declared through the decorator macros. The
//! `onebun` binary bootstraps [`ShopModule`] and prints its wiring report.
//!
//! ```text
//! ShopModule ── controllers: HealthController
//!     └── imports StoreModule ── providers: CatalogService, CartService
//!                              └─ controllers: CatalogController, CartController
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use onebun_application::{
    BaseService, Class, ConstructorArgs, Controller, ControllerBase, Injectable,
};
use onebun_domain::value_objects::{ParamKind, ParamMetadata};
use onebun_domain::{Error, Result};
use tokio::sync::Mutex;

/// Setting key holding the product list
pub const CATALOG_SETTING: &str = "catalog";

/// Products offered when the configuration has none
pub const DEFAULT_PRODUCTS: [&str; 3] = ["keyboard", "mouse", "monitor"];

// ============================================================================
// Services
// ============================================================================

/// Product catalog read from application settings
pub struct CatalogService {
    base: BaseService,
}

impl Class for CatalogService {}

impl Injectable for CatalogService {
    fn construct(args: &ConstructorArgs) -> Result<Self> {
        Ok(Self {
            base: BaseService::from_args::<Self>(args)?,
        })
    }
}

impl CatalogService {
    /// Configured products, or [`DEFAULT_PRODUCTS`]
    pub async fn products(&self) -> Result<Vec<String>> {
        let config = Arc::clone(self.base.config());
        let configured = self
            .base
            .run_effect(async move { config.setting::<Vec<String>>(CATALOG_SETTING) })
            .await?;

        Ok(configured
            .unwrap_or_else(|| DEFAULT_PRODUCTS.iter().map(ToString::to_string).collect()))
    }

    /// Whether a product is in the catalog
    pub async fn contains(&self, product: &str) -> Result<bool> {
        Ok(self.products().await?.iter().any(|known| known == product))
    }
}

/// In-memory shopping cart
pub struct CartService {
    base: BaseService,
    items: Mutex<BTreeMap<String, u32>>,
}

impl Class for CartService {}

impl Injectable for CartService {
    fn construct(args: &ConstructorArgs) -> Result<Self> {
        Ok(Self {
            base: BaseService::from_args::<Self>(args)?,
            items: Mutex::new(BTreeMap::new()),
        })
    }
}

impl CartService {
    /// Add one unit of a product and return its new quantity
    pub async fn add(&self, product: &str) -> u32 {
        let mut items = self.items.lock().await;
        let quantity = items.entry(product.to_string()).or_insert(0);
        *quantity += 1;
        self.base
            .logger()
            .debug(format_args!("Added {product} (x{quantity})"));
        *quantity
    }

    /// Current cart contents
    pub async fn items(&self) -> BTreeMap<String, u32> {
        self.items.lock().await.clone()
    }
}

// ============================================================================
// Controllers
// ============================================================================

/// `GET /catalog`
pub struct CatalogController {
    base: ControllerBase,
    catalog: Option<Arc<CatalogService>>,
}

impl Class for CatalogController {
    const SIGNATURE: &'static str =
        stringify!(fn new(catalog: Arc<CatalogService>, logger: Logger, config: Config));
}

impl Injectable for CatalogController {
    fn construct(args: &ConstructorArgs) -> Result<Self> {
        Ok(Self {
            base: ControllerBase::from_args::<Self>(args)?,
            catalog: args.dependency::<CatalogService>(),
        })
    }
}

impl Controller for CatalogController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }
}

impl CatalogController {
    pub async fn list(&self) -> Result<Vec<String>> {
        self.catalog()?.products().await
    }

    fn catalog(&self) -> Result<&Arc<CatalogService>> {
        self.catalog
            .as_ref()
            .ok_or_else(|| Error::service_not_found(CatalogService::class_name()))
    }
}

/// `POST /cart/:product`
///
/// The constructor is described by parameter names only, so its
/// dependencies are guessed from `cartService` and `catalogService`.
pub struct CartController {
    base: ControllerBase,
    cart: Option<Arc<CartService>>,
}

impl Class for CartController {
    const SIGNATURE: &'static str = "constructor(cartService, catalogService, logger)";
}

impl Injectable for CartController {
    fn construct(args: &ConstructorArgs) -> Result<Self> {
        Ok(Self {
            base: ControllerBase::from_args::<Self>(args)?,
            cart: args.dependency::<CartService>(),
        })
    }
}

impl Controller for CartController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }
}

impl CartController {
    /// Add a catalog product to the cart
    pub async fn add(&self, product: &str) -> Result<u32> {
        // The catalog was not kept as a field; fetch it from the base registry
        let catalog = self.base.service::<CatalogService>()?;
        if !catalog.contains(product).await? {
            return Err(Error::internal(format!("Unknown product: {product}")));
        }

        let cart = self
            .cart
            .as_ref()
            .ok_or_else(|| Error::service_not_found(CartService::class_name()))?;
        Ok(cart.add(product).await)
    }

    pub async fn items(&self) -> Result<BTreeMap<String, u32>> {
        Ok(self.base.service::<CartService>()?.items().await)
    }
}

/// `GET /health`
pub struct HealthController {
    base: ControllerBase,
}

impl Class for HealthController {
    const SIGNATURE: &'static str = "constructor(config)";
}

impl Injectable for HealthController {
    fn construct(args: &ConstructorArgs) -> Result<Self> {
        Ok(Self {
            base: ControllerBase::from_args::<Self>(args)?,
        })
    }
}

impl Controller for HealthController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }
}

impl HealthController {
    pub fn status(&self) -> String {
        format!("{} ok", self.base.config().name)
    }
}

// ============================================================================
// Modules
// ============================================================================

/// Catalog and cart feature module
pub struct StoreModule;
impl Class for StoreModule {}

/// Root module of the demo
pub struct ShopModule;
impl Class for ShopModule {}

onebun_application::service!(CatalogService);
onebun_application::service!(CartService);

onebun_application::controller!(CatalogController, "/catalog");
onebun_application::route!(CatalogController, Get, "/", list);

onebun_application::controller!(CartController, "/cart");
onebun_application::route!(CartController, Post, "/:product", add);
onebun_application::param!(
    CartController,
    add,
    ParamMetadata::new(ParamKind::Path, "product", 0).required()
);
onebun_application::route!(CartController, Get, "/", items);

onebun_application::controller!(HealthController, "/health");
onebun_application::route!(HealthController, Get, "/", status);

onebun_application::module!(StoreModule {
    imports: [],
    controllers: [CatalogController, CartController],
    providers: [CatalogService, CartService],
});
onebun_application::module!(ShopModule {
    imports: [StoreModule],
    controllers: [HealthController],
    providers: [],
});
