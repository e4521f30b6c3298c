use std::collections::HashMap;

use crate::state::AppState;
use crate::{
    errors,
    http::{Request, Response},
};
use errors::{Error, Result};
use matchit::Router;

/// Utility macro generating a constant for the HTTP endpoint, and associate
/// it with an identifier. Matchit requires both.
macro_rules! make_paths {
        ($($name:ident: $path:expr,)*) => {

        pub mod paths {
                    $(
                        pub const $name: &str = concat!("/api/v1", $path);
                    )*
        }
        pub mod endpoints {
            $(
                pub const $name: &str = stringify!($name);
            )*
        }

        }
    }

make_paths! {
    MENU_ITEMS: "/menu-items",
    MENU_ITEM_BY_SLUG: "/menu-items/slug/{slug}",
    OFFERS: "/offers",
    OFFER_BY_SLUG: "/offers/slug/{slug}",
    PICKUP_DATES: "/pickup/dates",
    PICKUP_SLOTS: "/pickup/slots",
    CART: "/cart/{session_id}",
    CART_ITEMS: "/cart/{session_id}/items",
    CART_ITEM_BY_ID: "/cart/{session_id}/items/{cart_item_id}",
    PAYMENTS: "/payments",
    REVALIDATE: "/revalidate",
}

/// Utility to add a list of paths to the router automatically
macro_rules! add_path{
    ($router:ident $(, $path:ident)*) => {
        $(
            $router.insert(paths::$path, endpoints::$path)?;
        )*
    }
}

/// Names of the parameters in the HTTP paths, used to extract them
/// from the parameters inside of request handling
pub mod params {
    /// Key of menu item / offer slugs in HTTP paths
    pub const SLUG: &str = "slug";

    /// Key of session ids in HTTP paths
    pub const SESSION_ID: &str = "session_id";

    /// Key of cart line ids in HTTP paths
    pub const CART_ITEM_ID: &str = "cart_item_id";
}

/// Return the HTTP path for a menu item based on its slug
pub fn menu_item_by_slug(slug: &str) -> String {
    paths::MENU_ITEM_BY_SLUG.replace("{slug}", slug)
}

/// Return the HTTP path for an offer based on its slug
pub fn offer_by_slug(slug: &str) -> String {
    paths::OFFER_BY_SLUG.replace("{slug}", slug)
}

/// Return the HTTP path for a session's cart
pub fn cart(session_id: &str) -> String {
    paths::CART.replace("{session_id}", session_id)
}

/// Return the HTTP path for a session's cart item collection
pub fn cart_items(session_id: &str) -> String {
    paths::CART_ITEMS.replace("{session_id}", session_id)
}

/// Return the HTTP path for one cart line
pub fn cart_item_by_id(session_id: &str, cart_item_id: u32) -> String {
    paths::CART_ITEM_BY_ID
        .replace("{session_id}", session_id)
        .replace("{cart_item_id}", &cart_item_id.to_string())
}

// spurious warning, this is used in tests
#[allow(unused_macros)]
/// Utility to create easily hashmaps of parameters for testing
macro_rules! make_params {
    () => {
        std::collections::HashMap::new()
    };
    ($name:ident: $value:expr $(, $name2:ident: $value2:expr)* ) => {
        {
            let mut map = std::collections::HashMap::new();
            map.insert(params::$name.to_string(), $value.to_string());
            $(
                map.insert(params::$name2.to_string(), $value2.to_string());
            )*
            map
        }
        }
    }

#[allow(unused_imports)]
pub(crate) use make_params;

/// Create a new router with the paths defined in this module
///
/// Errors from this function are programming errors, most likely stemming
/// from a misuse of matchit
fn new_router() -> errors::Result<Router<&'static str>> {
    let mut router = Router::new();
    add_path!(
        router,
        MENU_ITEMS,
        MENU_ITEM_BY_SLUG,
        OFFERS,
        OFFER_BY_SLUG,
        PICKUP_DATES,
        PICKUP_SLOTS,
        CART,
        CART_ITEMS,
        CART_ITEM_BY_ID,
        PAYMENTS,
        REVALIDATE
    );
    Ok(router)
}

/// Type of the object containing the HTTP path parameters passed to handlers
pub type HttpParams = HashMap<String, String>;
/// Type of the function that handles HTTP requests
pub type HttpHandler = fn(Request, HttpParams, &mut AppState) -> Result<Response>;

/// The router is in charge of taking in parsed HTTP requests and
/// dispatching them to the appropriate handler function.
pub struct HttpRouter {
    routes: Router<&'static str>,
    handlers: HashMap<&'static str, HashMap<&'static str, HttpHandler>>,
}

impl HttpRouter {
    /// Creates a new empty router
    ///
    /// Although the matchit router is not empty, there are no methods
    /// associated to the routes yet, so no request can be processed.
    /// Errors in this function are programming errors.
    pub fn new() -> Result<Self> {
        let routes = new_router()?;
        Ok(HttpRouter {
            routes,
            handlers: HashMap::new(),
        })
    }

    /// Associate a handler with a method on a route
    pub fn add_route(&mut self, method: &'static str, route: &'static str, handler: HttpHandler) {
        let method_to_handler = self.handlers.entry(route).or_default();
        method_to_handler.insert(method, handler);
    }

    /// Sends a request to the appropriate handler if it exists
    ///
    /// If there is a route matching the request, its handler is called and
    /// its result becomes the result of this function. If no route is
    /// defined for this request, return Error::NotFound.
    ///
    /// Checking that all parameters are present and that the body is
    /// correct is the responsibility of the handler.
    pub fn route(&self, request: Request, state: &mut AppState) -> Result<Response> {
        let route = self
            .routes
            .at(&request.path)
            .map_err(|err| errors::Error::NotFound(err.to_string()))?;
        let method_to_handler = self.handlers.get(route.value).ok_or_else(|| {
            Error::NotFound(format!(
                "No method associated to this route: {}",
                route.value
            ))
        })?;
        let handler = method_to_handler
            .get(request.method.as_str())
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "No handler for {} {}",
                    request.method.as_str(),
                    route.value
                ))
            })?;

        let params: HashMap<String, String> = route
            .params
            .iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        handler(request, params, state)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::{mock::MockCatalog, Catalog};
    use crate::config::Config;
    use crate::upstream::mock::MockUpstream;

    fn test_state() -> AppState {
        let config = Config::build(
            "127.0.0.1:9898",
            "127.0.0.1:9999",
            "s3cret",
            "America/New_York",
            "Mon",
            "11:00",
            "22:30",
        )
        .unwrap();
        AppState::new(
            config,
            Box::new(MockCatalog::new().unwrap()),
            Box::new(MockUpstream::default()),
        )
    }

    #[test]
    fn test_routes() {
        let router = new_router().unwrap();
        assert_eq!(
            *router.at("/api/v1/menu-items").unwrap().value,
            endpoints::MENU_ITEMS
        );
        assert_eq!(
            *router.at("/api/v1/menu-items/slug/margherita").unwrap().value,
            endpoints::MENU_ITEM_BY_SLUG
        );
        assert_eq!(
            *router.at("/api/v1/pickup/slots").unwrap().value,
            endpoints::PICKUP_SLOTS
        );
        assert_eq!(*router.at("/api/v1/cart/abc").unwrap().value, endpoints::CART);
        assert_eq!(
            *router.at("/api/v1/cart/abc/items/3").unwrap().value,
            endpoints::CART_ITEM_BY_ID
        );
    }

    #[test]
    fn test_route_params() {
        let router = new_router().unwrap();
        let route = router.at("/api/v1/cart/abc/items/3").unwrap();
        let params = route.params;
        assert_eq!(params.get(params::SESSION_ID), Some("abc"));
        assert_eq!(params.get(params::CART_ITEM_ID), Some("3"));
    }

    #[test]
    fn test_missing_routes() {
        let router = new_router().unwrap();
        assert!(router.at("/api/v1/missing").is_err());
        assert!(router.at("/api/v2/menu-items").is_err());
    }

    #[test]
    fn test_path_builders() {
        assert_eq!(menu_item_by_slug("margherita"), "/api/v1/menu-items/slug/margherita");
        assert_eq!(offer_by_slug("happy-hour"), "/api/v1/offers/slug/happy-hour");
        assert_eq!(cart("abc"), "/api/v1/cart/abc");
        assert_eq!(cart_items("abc"), "/api/v1/cart/abc/items");
        assert_eq!(cart_item_by_id("abc", 3), "/api/v1/cart/abc/items/3");
    }

    #[test]
    fn test_make_params() {
        let params = make_params!(SESSION_ID: "abc", CART_ITEM_ID: "3");
        assert_eq!(params.get(params::SESSION_ID).unwrap(), "abc");
        assert_eq!(params.get(params::CART_ITEM_ID).unwrap(), "3");
    }

    #[test]
    fn test_router_dispatch() {
        const EXPECTED_GET: &str = "get_menu";
        const EXPECTED_POST: &str = "post_item";

        let mut state = test_state();

        let mut router = HttpRouter::new().unwrap();
        router.add_route("GET", endpoints::MENU_ITEMS, |_, _, _| {
            Ok(Response::json(EXPECTED_GET.to_string()))
        });
        router.add_route("POST", endpoints::CART_ITEMS, |_, _, _| {
            Ok(Response::json(EXPECTED_POST.to_string()))
        });

        let response = router
            .route(Request::get(paths::MENU_ITEMS), &mut state)
            .unwrap();
        assert_eq!(response.body, EXPECTED_GET);

        let response = router
            .route(Request::post(&cart_items("abc"), "".to_string()), &mut state)
            .unwrap();
        assert_eq!(response.body, EXPECTED_POST);

        // no DELETE registered on this route
        assert!(router
            .route(Request::delete(paths::MENU_ITEMS), &mut state)
            .is_err());
    }

    #[test]
    fn test_router_passes_path_parameters() {
        let mut router = HttpRouter::new().unwrap();
        let mut state = test_state();

        router.add_route("DELETE", endpoints::CART_ITEM_BY_ID, |_, params, _| {
            let session = params.get(params::SESSION_ID).unwrap();
            let item = params.get(params::CART_ITEM_ID).unwrap();
            Ok(Response::json(format!("{}:{}", session, item)))
        });

        let response = router
            .route(Request::delete(&cart_item_by_id("tbl42", 24)), &mut state)
            .unwrap();

        assert_eq!(response.body, "tbl42:24");
    }

    #[test]
    fn test_query_string_does_not_break_routing() {
        let mut router = HttpRouter::new().unwrap();
        let mut state = test_state();

        router.add_route("GET", endpoints::MENU_ITEMS, |request, _, _| {
            Ok(Response::json(
                request.query_param("category").unwrap_or("none").to_string(),
            ))
        });

        let target = format!("{}?category=mains", paths::MENU_ITEMS);
        let response = router.route(Request::get(&target), &mut state).unwrap();
        assert_eq!(response.body, "mains");
    }
}
