use crate::api::{AddToCart, Envelope, QuantityUpdate, RevalidateRequest};
use crate::cart::Cart;
use crate::catalog::MenuFilter;
use crate::config::MAX_DAYS_AHEAD;
use crate::errors::{BoxedError, Error, Result};
use crate::http::{Request, Response};
use crate::routes::{endpoints, params, HttpParams, HttpRouter};
use crate::schedule::{generate_available_dates, generate_time_slots, is_item_available_at};
use crate::state::AppState;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::warn;

/// Wire up every endpoint of the public surface
pub fn create_http_router() -> Result<HttpRouter> {
    let mut router = HttpRouter::new()?;

    router.add_route("GET", endpoints::MENU_ITEMS, get_menu_items);
    router.add_route("GET", endpoints::MENU_ITEM_BY_SLUG, get_menu_item_by_slug);
    router.add_route("GET", endpoints::OFFERS, get_offers);
    router.add_route("GET", endpoints::OFFER_BY_SLUG, get_offer_by_slug);
    router.add_route("GET", endpoints::PICKUP_DATES, get_pickup_dates);
    router.add_route("GET", endpoints::PICKUP_SLOTS, get_pickup_slots);
    router.add_route("GET", endpoints::CART, get_cart);
    router.add_route("POST", endpoints::CART_ITEMS, post_cart_item);
    router.add_route("PUT", endpoints::CART_ITEM_BY_ID, put_cart_item);
    router.add_route("PATCH", endpoints::CART_ITEM_BY_ID, patch_cart_item);
    router.add_route("DELETE", endpoints::CART_ITEM_BY_ID, delete_cart_item);
    router.add_route("DELETE", endpoints::CART, delete_cart);
    router.add_route("POST", endpoints::PAYMENTS, post_payment);
    router.add_route("POST", endpoints::REVALIDATE, post_revalidate);

    Ok(router)
}

/// Map a handler error to the HTTP response the client sees.
///
/// Client mistakes carry their message; upstream trouble is a bad gateway;
/// everything unexpected collapses into a bare 500.
pub fn error_response(err: BoxedError) -> Response {
    match err.downcast_ref::<Error>() {
        Some(Error::BadRequest(msg)) => Response::client_error(400, msg),
        Some(Error::MalformedTime(_)) => Response::client_error(400, &err.to_string()),
        Some(Error::Unauthorized(_)) => Response::error(401),
        Some(Error::NotFound(msg)) => Response::client_error(404, msg),
        Some(Error::Upstream(_)) | Some(Error::NoResponse) | Some(Error::ConnectionReset) => {
            warn!("upstream failure: {}", err);
            Response::error(502)
        }
        _ => {
            warn!("unhandled error: {}", err);
            Response::internal_server_error()
        }
    }
}

fn enveloped<T: Serialize>(data: &T) -> Result<Response> {
    Ok(Response::json(serde_json::to_string(&Envelope { data })?))
}

fn path_param<'a>(params: &'a HttpParams, key: &str) -> Result<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| Error::BadRequest(format!("Missing {}", key)).into())
}

fn parse_body<'a, T: serde::Deserialize<'a>>(request: &'a Request) -> Result<T> {
    serde_json::from_str(&request.body)
        .map_err(|err| Error::BadRequest(format!("Invalid body: {}", err)).into())
}

fn numeric_query(request: &Request, name: &str) -> Result<Option<u32>> {
    match request.query_param(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u32>()
            .map(Some)
            .map_err(|_| Error::BadRequest(format!("'{}' is not a valid {}", raw, name)).into()),
    }
}

fn get_menu_items(request: Request, _: HttpParams, state: &mut AppState) -> Result<Response> {
    let filter = MenuFilter {
        category: request.query_param("category").map(str::to_string),
        exclude_slug: request.query_param("exclude").map(str::to_string),
        popular_only: request.query_param("popular") == Some("true"),
        limit: numeric_query(&request, "limit")?,
    };
    let mut items = state.catalog.menu_items(&filter)?;

    // With a pickup time chosen, drop what cannot be ordered then. An item
    // whose window does not parse is dropped too: unknown availability must
    // not sell food the kitchen will refuse.
    if let Some(pickup_time) = request.query_param("pickup_time") {
        items.retain(|item| match is_item_available_at(item, Some(pickup_time)) {
            Ok(available) => available,
            Err(err) => {
                warn!(slug = %item.slug, "unreadable availability window: {}", err);
                false
            }
        });
    }

    enveloped(&items)
}

fn get_menu_item_by_slug(_: Request, params: HttpParams, state: &mut AppState) -> Result<Response> {
    let slug = path_param(&params, params::SLUG)?;
    let item = state.catalog.menu_item_by_slug(slug)?;
    enveloped(&item)
}

fn get_offers(_: Request, _: HttpParams, state: &mut AppState) -> Result<Response> {
    let offers = state.catalog.offers()?;
    enveloped(&offers)
}

fn get_offer_by_slug(_: Request, params: HttpParams, state: &mut AppState) -> Result<Response> {
    let slug = path_param(&params, params::SLUG)?;
    let offer = state.catalog.offer_by_slug(slug)?;
    enveloped(&offer)
}

fn get_pickup_dates(request: Request, _: HttpParams, state: &mut AppState) -> Result<Response> {
    let days_ahead = numeric_query(&request, "days_ahead")?.unwrap_or(state.config.days_ahead);
    if days_ahead > MAX_DAYS_AHEAD {
        return Err(Error::BadRequest(format!(
            "days_ahead {} exceeds the maximum of {}",
            days_ahead, MAX_DAYS_AHEAD
        ))
        .into());
    }
    let dates = generate_available_dates(&state.config.hours, days_ahead, state.now().date());
    enveloped(&dates)
}

fn get_pickup_slots(request: Request, _: HttpParams, state: &mut AppState) -> Result<Response> {
    let raw_date = request
        .query_param("date")
        .ok_or(Error::BadRequest("Missing date".to_string()))?;
    let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
        .map_err(|_| Error::BadRequest(format!("'{}' is not a YYYY-MM-DD date", raw_date)))?;
    let interval = numeric_query(&request, "interval")?.unwrap_or(state.config.interval_minutes);

    // A closed weekday has no slots at all; an empty list, not an error
    let slots = if state.config.hours.is_closed_on(date.weekday()) {
        vec![]
    } else {
        generate_time_slots(&state.config.hours, date, interval, state.now())
    };
    enveloped(&slots)
}

fn get_cart(_: Request, params: HttpParams, state: &mut AppState) -> Result<Response> {
    let session_id = path_param(&params, params::SESSION_ID)?;
    // Reads must not allocate carts, or arbitrary GETs would grow the map
    match state.carts.cart(session_id) {
        Some(cart) => enveloped(&cart.snapshot()),
        None => enveloped(&Cart::new().snapshot()),
    }
}

fn post_cart_item(request: Request, params: HttpParams, state: &mut AppState) -> Result<Response> {
    let session_id = path_param(&params, params::SESSION_ID)?;
    let body: AddToCart = parse_body(&request)?;

    let cart = state.carts.cart_mut(session_id);
    cart.add_item(body)?;
    Ok(Response::created(serde_json::to_string(&Envelope {
        data: &cart.snapshot(),
    })?))
}

fn put_cart_item(request: Request, params: HttpParams, state: &mut AppState) -> Result<Response> {
    let session_id = path_param(&params, params::SESSION_ID)?;
    let cart_item_id = cart_item_id(&params)?;
    let body: AddToCart = parse_body(&request)?;

    let cart = state.carts.cart_mut(session_id);
    match cart.update_item(cart_item_id, body)? {
        Some(_) => enveloped(&cart.snapshot()),
        None => Err(Error::NotFound(format!("No cart item {}", cart_item_id)).into()),
    }
}

fn patch_cart_item(request: Request, params: HttpParams, state: &mut AppState) -> Result<Response> {
    let session_id = path_param(&params, params::SESSION_ID)?;
    let cart_item_id = cart_item_id(&params)?;
    let body: QuantityUpdate = parse_body(&request)?;

    // Unknown ids fall through silently: the frontend may race a removal
    // against a re-render and both outcomes look the same to it
    let cart = state.carts.cart_mut(session_id);
    cart.update_quantity(cart_item_id, body.quantity)?;
    enveloped(&cart.snapshot())
}

fn delete_cart_item(_: Request, params: HttpParams, state: &mut AppState) -> Result<Response> {
    let session_id = path_param(&params, params::SESSION_ID)?;
    let cart_item_id = cart_item_id(&params)?;
    state.carts.cart_mut(session_id).remove_item(cart_item_id);
    Ok(Response::ok())
}

fn delete_cart(_: Request, params: HttpParams, state: &mut AppState) -> Result<Response> {
    let session_id = path_param(&params, params::SESSION_ID)?;
    state.carts.drop_cart(session_id);
    Ok(Response::ok())
}

fn post_payment(request: Request, _: HttpParams, state: &mut AppState) -> Result<Response> {
    // The order body belongs to the gateway; we only insist that it is JSON
    serde_json::from_str::<serde_json::Value>(&request.body)
        .map_err(|err| Error::BadRequest(format!("Invalid order body: {}", err)))?;

    let receipt = state.upstream.initiate_payment(&request.body)?;
    Ok(Response::created(serde_json::to_string(&receipt)?))
}

fn post_revalidate(request: Request, _: HttpParams, state: &mut AppState) -> Result<Response> {
    let body: RevalidateRequest = parse_body(&request)?;

    let secret = body.secret.unwrap_or_default();
    if state.config.revalidate_secret.is_empty() || secret != state.config.revalidate_secret {
        return Err(Error::Unauthorized("revalidation secret mismatch".to_string()).into());
    }

    let path = body
        .path
        .ok_or(Error::BadRequest("Missing path".to_string()))?;

    match path.as_str() {
        "/menu" | "/menu-items" => {
            let items = state.upstream.fetch_menu_items()?;
            state.catalog.replace_menu(items)?;
        }
        "/offers" => {
            let offers = state.upstream.fetch_offers()?;
            state.catalog.replace_offers(offers)?;
        }
        other => return Err(Error::NotFound(format!("Nothing cached under '{}'", other)).into()),
    }

    Ok(Response::json(
        serde_json::json!({ "revalidated": path }).to_string(),
    ))
}

fn cart_item_id(params: &HttpParams) -> Result<u32> {
    path_param(params, params::CART_ITEM_ID)?
        .parse::<u32>()
        .map_err(|err| Error::BadRequest(err.to_string()).into())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::{mock::MockCatalog, Catalog};
    use crate::config::Config;
    use crate::routes;
    use crate::upstream::mock::MockUpstream;

    fn test_config() -> Config {
        Config::build(
            "127.0.0.1:9898",
            "127.0.0.1:9999",
            "s3cret",
            "America/New_York",
            "Mon",
            "11:00",
            "22:30",
        )
        .unwrap()
    }

    fn test_state(items: Vec<crate::api::MenuItem>) -> AppState {
        let mut catalog = MockCatalog::new().unwrap();
        catalog.replace_menu(items).unwrap();
        AppState::new(
            test_config(),
            Box::new(catalog),
            Box::new(MockUpstream::default()),
        )
    }

    fn item(id: u32, slug: &str) -> crate::api::MenuItem {
        crate::api::MenuItem {
            id,
            slug: slug.to_string(),
            name: slug.replace('-', " "),
            price_cents: 100 * id,
            category: Some("mains".to_string()),
            popular: false,
            image_url: None,
            start_time: None,
            end_time: None,
            choices: vec![],
        }
    }

    fn body_json(response: &Response) -> serde_json::Value {
        serde_json::from_str(&response.body).unwrap()
    }

    fn dispatch(state: &mut AppState, request: Request) -> Result<Response> {
        create_http_router().unwrap().route(request, state)
    }

    fn add_body(menu_item_id: u32, quantity: u32, price_cents: u32) -> String {
        serde_json::json!({
            "menu_item_id": menu_item_id,
            "name": "Margherita",
            "quantity": quantity,
            "price_cents": price_cents,
        })
        .to_string()
    }

    #[test]
    fn test_menu_listing_and_filters() {
        let mut lunch_only = item(2, "lunch-special");
        lunch_only.start_time = Some("11:00:00".to_string());
        lunch_only.end_time = Some("15:00:00".to_string());
        let mut broken = item(3, "broken-window");
        broken.start_time = Some("eleven".to_string());
        broken.end_time = Some("15:00:00".to_string());
        let mut state = test_state(vec![item(1, "margherita"), lunch_only, broken]);

        let response = dispatch(&mut state, Request::get(routes::paths::MENU_ITEMS)).unwrap();
        assert_eq!(response.status, Some(200));
        assert_eq!(body_json(&response)["data"].as_array().unwrap().len(), 3);

        // after the lunch window: the windowed item disappears, and so does
        // the unparseable one (fail safe, not fail open)
        let target = format!("{}?pickup_time=16:00", routes::paths::MENU_ITEMS);
        let response = dispatch(&mut state, Request::get(&target)).unwrap();
        let data = body_json(&response);
        let slugs: Vec<&str> = data["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, vec!["margherita"]);

        // inside the window both real items show, the broken one never does
        let target = format!("{}?pickup_time=12:00", routes::paths::MENU_ITEMS);
        let response = dispatch(&mut state, Request::get(&target)).unwrap();
        assert_eq!(body_json(&response)["data"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_menu_item_by_slug() {
        let mut state = test_state(vec![item(1, "margherita")]);

        let response = dispatch(
            &mut state,
            Request::get(&routes::menu_item_by_slug("margherita")),
        )
        .unwrap();
        assert_eq!(body_json(&response)["data"]["id"], 1);

        let missing = dispatch(
            &mut state,
            Request::get(&routes::menu_item_by_slug("no-such-dish")),
        );
        assert_eq!(error_response(missing.unwrap_err()).status, Some(404));
    }

    #[test]
    fn test_pickup_dates_shape() {
        let mut state = test_state(vec![]);
        let today = state.now().date();

        let response = dispatch(&mut state, Request::get(routes::paths::PICKUP_DATES)).unwrap();
        let data = body_json(&response);
        let dates = data["data"].as_array().unwrap();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0]["label"], "Today");
        assert_eq!(dates[0]["date"], today.format("%Y-%m-%d").to_string());

        let target = format!("{}?days_ahead=3", routes::paths::PICKUP_DATES);
        let response = dispatch(&mut state, Request::get(&target)).unwrap();
        assert_eq!(body_json(&response)["data"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_days_ahead_is_bounded() {
        let mut state = test_state(vec![]);

        // the maximum itself is fine
        let target = format!("{}?days_ahead={}", routes::paths::PICKUP_DATES, MAX_DAYS_AHEAD);
        let response = dispatch(&mut state, Request::get(&target)).unwrap();
        assert_eq!(
            body_json(&response)["data"].as_array().unwrap().len(),
            MAX_DAYS_AHEAD as usize
        );

        // anything above must bounce before allocating
        let target = format!("{}?days_ahead=4294967295", routes::paths::PICKUP_DATES);
        let result = dispatch(&mut state, Request::get(&target));
        assert_eq!(error_response(result.unwrap_err()).status, Some(400));
    }

    #[test]
    fn test_pickup_slots_for_future_and_closed_days() {
        let mut state = test_state(vec![]);

        // a Tuesday far in the future: the full grid from open to close
        let target = format!("{}?date=2031-06-03", routes::paths::PICKUP_SLOTS);
        let response = dispatch(&mut state, Request::get(&target)).unwrap();
        let data = body_json(&response);
        let slots = data["data"].as_array().unwrap();
        assert_eq!(slots.first().unwrap()["value"], "11:00");
        assert_eq!(slots.last().unwrap()["value"], "22:30");

        // Mondays are configured closed
        let target = format!("{}?date=2031-06-02", routes::paths::PICKUP_SLOTS);
        let response = dispatch(&mut state, Request::get(&target)).unwrap();
        assert!(body_json(&response)["data"].as_array().unwrap().is_empty());

        let bad = dispatch(&mut state, Request::get(&format!(
            "{}?date=June%203rd",
            routes::paths::PICKUP_SLOTS
        )));
        assert_eq!(error_response(bad.unwrap_err()).status, Some(400));
    }

    #[test]
    fn test_cart_flow_through_endpoints() {
        let mut state = test_state(vec![]);
        let session = "sess-1";

        // two identical adds merge into one line
        for _ in 0..2 {
            let response = dispatch(
                &mut state,
                Request::post(&routes::cart_items(session), add_body(7, 1, 1000)),
            )
            .unwrap();
            assert_eq!(response.status, Some(201));
        }
        let response = dispatch(&mut state, Request::get(&routes::cart(session))).unwrap();
        let data = body_json(&response);
        assert_eq!(data["data"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(data["data"]["total_cents"], 2000);
        assert_eq!(data["data"]["item_count"], 2);
        let line_id = data["data"]["items"][0]["cart_item_id"].as_u64().unwrap() as u32;

        // resize to 3 units: totals follow the unit price
        let response = dispatch(
            &mut state,
            Request::patch(
                &routes::cart_item_by_id(session, line_id),
                "{\"quantity\": 3}".to_string(),
            ),
        )
        .unwrap();
        assert_eq!(body_json(&response)["data"]["total_cents"], 3000);

        // quantity zero removes the line entirely
        let response = dispatch(
            &mut state,
            Request::patch(
                &routes::cart_item_by_id(session, line_id),
                "{\"quantity\": 0}".to_string(),
            ),
        )
        .unwrap();
        let data = body_json(&response);
        assert!(data["data"]["items"].as_array().unwrap().is_empty());
        assert_eq!(data["data"]["item_count"], 0);

        // deleting an id that is already gone is fine
        let response = dispatch(
            &mut state,
            Request::delete(&routes::cart_item_by_id(session, line_id)),
        )
        .unwrap();
        assert_eq!(response.status, Some(204));
    }

    #[test]
    fn test_put_replaces_or_reports_not_found() {
        let mut state = test_state(vec![]);
        let session = "sess-2";

        dispatch(
            &mut state,
            Request::post(&routes::cart_items(session), add_body(7, 1, 1000)),
        )
        .unwrap();
        let response = dispatch(&mut state, Request::get(&routes::cart(session))).unwrap();
        let line_id =
            body_json(&response)["data"]["items"][0]["cart_item_id"].as_u64().unwrap() as u32;

        let response = dispatch(
            &mut state,
            Request::put(&routes::cart_item_by_id(session, line_id), add_body(7, 2, 2400)),
        )
        .unwrap();
        let data = body_json(&response);
        assert_eq!(data["data"]["items"][0]["quantity"], 2);
        assert_eq!(data["data"]["total_cents"], 2400);

        let missing = dispatch(
            &mut state,
            Request::put(&routes::cart_item_by_id(session, 999), add_body(7, 1, 1000)),
        );
        assert_eq!(error_response(missing.unwrap_err()).status, Some(404));
    }

    #[test]
    fn test_clear_cart() {
        let mut state = test_state(vec![]);
        dispatch(
            &mut state,
            Request::post(&routes::cart_items("s"), add_body(1, 1, 500)),
        )
        .unwrap();

        let response = dispatch(&mut state, Request::delete(&routes::cart("s"))).unwrap();
        assert_eq!(response.status, Some(204));

        let response = dispatch(&mut state, Request::get(&routes::cart("s"))).unwrap();
        assert_eq!(body_json(&response)["data"]["total_cents"], 0);
    }

    #[test]
    fn test_oversized_quantities_are_rejected() {
        let mut state = test_state(vec![]);
        let session = "sess-3";

        dispatch(
            &mut state,
            Request::post(&routes::cart_items(session), add_body(7, 1, 2100)),
        )
        .unwrap();
        let response = dispatch(&mut state, Request::get(&routes::cart(session))).unwrap();
        let line_id =
            body_json(&response)["data"]["items"][0]["cart_item_id"].as_u64().unwrap() as u32;

        let result = dispatch(
            &mut state,
            Request::patch(
                &routes::cart_item_by_id(session, line_id),
                "{\"quantity\": 3000000}".to_string(),
            ),
        );
        assert_eq!(error_response(result.unwrap_err()).status, Some(400));

        // the cart is untouched and the next request still works
        let response = dispatch(&mut state, Request::get(&routes::cart(session))).unwrap();
        let data = body_json(&response);
        assert_eq!(data["data"]["items"][0]["quantity"], 1);
        assert_eq!(data["data"]["total_cents"], 2100);
    }

    #[test]
    fn test_reading_a_cart_does_not_create_one() {
        let mut state = test_state(vec![]);

        let response = dispatch(&mut state, Request::get(&routes::cart("ghost"))).unwrap();
        assert_eq!(response.status, Some(200));
        assert_eq!(body_json(&response)["data"]["item_count"], 0);

        assert!(state.carts.cart("ghost").is_none());
    }

    #[test]
    fn test_sessions_do_not_leak_into_each_other() {
        let mut state = test_state(vec![]);
        dispatch(
            &mut state,
            Request::post(&routes::cart_items("alpha"), add_body(1, 1, 500)),
        )
        .unwrap();

        let response = dispatch(&mut state, Request::get(&routes::cart("beta"))).unwrap();
        assert_eq!(body_json(&response)["data"]["item_count"], 0);
    }

    #[test]
    fn test_payment_proxy() {
        let mut state = test_state(vec![]);

        let order = serde_json::json!({ "items": [], "pickup_time": "14:30" }).to_string();
        let response = dispatch(
            &mut state,
            Request::post(routes::paths::PAYMENTS, order),
        )
        .unwrap();
        assert_eq!(response.status, Some(201));
        let receipt = body_json(&response);
        assert!(receipt["data"]["unique_id"].is_string());

        let garbage = dispatch(
            &mut state,
            Request::post(routes::paths::PAYMENTS, "not json".to_string()),
        );
        assert_eq!(error_response(garbage.unwrap_err()).status, Some(400));
    }

    #[test]
    fn test_payment_gateway_down_is_a_bad_gateway() {
        let mut state = AppState::new(
            test_config(),
            Box::new(MockCatalog::new().unwrap()),
            Box::new(MockUpstream {
                unreachable: true,
                ..MockUpstream::default()
            }),
        );

        let result = dispatch(
            &mut state,
            Request::post(routes::paths::PAYMENTS, "{}".to_string()),
        );
        assert_eq!(error_response(result.unwrap_err()).status, Some(502));
    }

    #[test]
    fn test_revalidate_requires_the_secret() {
        let mut state = test_state(vec![]);

        let body = serde_json::json!({ "path": "/menu", "secret": "wrong" }).to_string();
        let result = dispatch(&mut state, Request::post(routes::paths::REVALIDATE, body));
        assert_eq!(error_response(result.unwrap_err()).status, Some(401));

        let body = serde_json::json!({ "path": "/menu" }).to_string();
        let result = dispatch(&mut state, Request::post(routes::paths::REVALIDATE, body));
        assert_eq!(error_response(result.unwrap_err()).status, Some(401));
    }

    #[test]
    fn test_revalidate_requires_a_path() {
        let mut state = test_state(vec![]);

        let body = serde_json::json!({ "secret": "s3cret" }).to_string();
        let result = dispatch(&mut state, Request::post(routes::paths::REVALIDATE, body));
        assert_eq!(error_response(result.unwrap_err()).status, Some(400));

        let body = serde_json::json!({ "path": "/gallery", "secret": "s3cret" }).to_string();
        let result = dispatch(&mut state, Request::post(routes::paths::REVALIDATE, body));
        assert_eq!(error_response(result.unwrap_err()).status, Some(404));
    }

    #[test]
    fn test_revalidate_refreshes_the_menu() {
        let mut state = AppState::new(
            test_config(),
            Box::new(MockCatalog::new().unwrap()),
            Box::new(MockUpstream {
                items: vec![item(42, "new-dish")],
                ..MockUpstream::default()
            }),
        );

        // empty before revalidation
        let response = dispatch(&mut state, Request::get(routes::paths::MENU_ITEMS)).unwrap();
        assert!(body_json(&response)["data"].as_array().unwrap().is_empty());

        let body = serde_json::json!({ "path": "/menu", "secret": "s3cret" }).to_string();
        let response =
            dispatch(&mut state, Request::post(routes::paths::REVALIDATE, body)).unwrap();
        assert_eq!(response.status, Some(200));

        let response = dispatch(&mut state, Request::get(routes::paths::MENU_ITEMS)).unwrap();
        let data = body_json(&response);
        assert_eq!(data["data"][0]["slug"], "new-dish");
    }
}
