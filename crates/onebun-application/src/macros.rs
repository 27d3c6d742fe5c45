//! Link-time decorator macros
//!
//! Each macro submits one [`Decorator`](crate::metadata::Decorator) entry to
//! the [`DECORATORS`](crate::metadata::DECORATORS) slice. Entries are applied
//! when the global registry is first accessed, so declaration order across
//! files does not matter.
//!
//! # Example
//!
//! ```ignore
//! onebun_application::service!(UserService);
//! onebun_application::controller!(UserController, "/users");
//! onebun_application::route!(UserController, Get, "/:id", get_user);
//! onebun_application::param!(UserController, get_user, ParamMetadata::new(ParamKind::Path, "id", 0));
//! onebun_application::module!(AppModule {
//!     imports: [],
//!     controllers: [UserController],
//!     providers: [UserService],
//! });
//! ```

/// Submit a raw decorator entry
#[doc(hidden)]
#[macro_export]
macro_rules! __decorator {
    ($class:ty, |$registry:ident| $body:expr) => {
        const _: () = {
            #[$crate::__private::linkme::distributed_slice($crate::metadata::DECORATORS)]
            #[linkme(crate = $crate::__private::linkme)]
            static DECORATOR: $crate::metadata::Decorator = $crate::metadata::Decorator {
                class_name: stringify!($class),
                apply: |$registry: &$crate::metadata::MetadataRegistry| {
                    $body;
                },
            };
        };
    };
}

/// Declare a service
///
/// `service!(Type)` binds the canonical tag; `service!(Type, tag = expr)`
/// binds an explicit one.
#[macro_export]
macro_rules! service {
    ($class:ty) => {
        $crate::__decorator!($class, |registry| registry.register_service::<$class>());
    };
    ($class:ty, tag = $tag:expr) => {
        $crate::__decorator!($class, |registry| {
            registry.register_service_with_tag::<$class>($tag)
        });
    };
}

/// Declare a controller mounted at a base path
#[macro_export]
macro_rules! controller {
    ($class:ty, $base_path:expr) => {
        $crate::__decorator!($class, |registry| {
            registry.register_controller::<$class>($base_path)
        });
    };
}

/// Declare a route on a controller handler
#[macro_export]
macro_rules! route {
    ($class:ty, $method:ident, $path:expr, $handler:ident) => {
        $crate::__decorator!($class, |registry| {
            registry.register_route::<$class>($crate::__private::RouteMetadata::new(
                $crate::__private::HttpMethod::$method,
                $path,
                stringify!($handler),
            ))
        });
    };
}

/// Declare a parameter record on a controller handler
#[macro_export]
macro_rules! param {
    ($class:ty, $handler:ident, $param:expr) => {
        $crate::__decorator!($class, |registry| {
            registry.register_param::<$class>(stringify!($handler), $param)
        });
    };
}

/// Declare a module with its imports, controllers and providers
#[macro_export]
macro_rules! module {
    ($class:ty {
        imports: [$($import:ty),* $(,)?],
        controllers: [$($controller:ty),* $(,)?],
        providers: [$($provider:ty),* $(,)?] $(,)?
    }) => {
        $crate::__decorator!($class, |registry| {
            let metadata = $crate::metadata::ModuleMetadata::new()
                $(.import::<$import>())*
                $(.controller::<$controller>())*
                $(.provider::<$provider>())*;
            registry.register_module::<$class>(metadata)
        });
    };
}
