use common::api;
use common::cart::CartSnapshot;
use common::cli::*;
use common::config::DEFAULT_LISTEN_ADDRESS;
use common::errors::Result;
use common::http::{code_to_string, HttpClient, Response};
use common::routes;
use common::schedule::{DateOption, TimeSlot};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde;

#[derive(Debug)]
enum Action {
    Menu,
    Item,
    Offers,
    Offer,
    Dates,
    Slots,
    Session,
    Cart,
    Add,
    Quantity,
    Remove,
    Clear,
    Pay,
}

#[derive(Debug)]
struct CLIOptions {
    target: String,
    action: Action,
    params: Vec<String>,
}

fn parse_action(action: String) -> std::result::Result<Action, CLIError> {
    match action.to_ascii_lowercase().as_str() {
        "menu" => Ok(Action::Menu),
        "item" => Ok(Action::Item),
        "offers" => Ok(Action::Offers),
        "offer" => Ok(Action::Offer),
        "dates" => Ok(Action::Dates),
        "slots" => Ok(Action::Slots),
        "session" => Ok(Action::Session),
        "cart" => Ok(Action::Cart),
        "add" => Ok(Action::Add),
        "qty" => Ok(Action::Quantity),
        "remove" => Ok(Action::Remove),
        "clear" => Ok(Action::Clear),
        "pay" => Ok(Action::Pay),
        _ => Err(CLIError::InvalidParameter),
    }
}

fn parse_cli_args<I>(mut args: I) -> Result<CLIOptions>
where
    I: Iterator<Item = String>,
{
    assert!(args.next().is_some()); // Skip the program name
    let maybe_target = args
        .next()
        .ok_or(CLIError::MissingParameter("target or action"))?;

    let (target, action) = match validate_address(maybe_target.as_str()) {
        Ok(target) => (
            target,
            args.next()
                .ok_or(CLIError::MissingParameter("action"))
                .and_then(&parse_action)?,
        ),
        Err(_) => (DEFAULT_LISTEN_ADDRESS, parse_action(maybe_target)?),
    };

    Ok(CLIOptions {
        target: target.to_string(),
        action,
        params: args.collect(),
    })
}

fn print_response<'a, Body>(response: &'a Response)
where
    Body: serde::Deserialize<'a> + std::fmt::Debug,
{
    match response.status {
        Some(code) => println!("Response Status: {} - {}", code, code_to_string(code)),
        None => println!("No status in response"),
    }
    if !response.body.is_empty() {
        let json = serde_json::from_str::<Body>(&response.body);
        match json {
            Ok(json) => println!("Response Body: {:?}", json),
            Err(e) => println!("Error parsing response body: {}\n{:?}", e, response.body),
        }
    }
}

fn param<'a>(params: &'a [String], index: usize, name: &'static str) -> Result<&'a str> {
    params
        .get(index)
        .map(String::as_str)
        .ok_or(CLIError::MissingParameter(name).into())
}

fn numeric_param(params: &[String], index: usize, name: &'static str) -> Result<u32> {
    param(params, index, name)?
        .parse::<u32>()
        .map_err(|_| CLIError::InvalidParameter.into())
}

fn main() {
    let options = parse_cli_args(std::env::args()).unwrap();
    let params = &options.params;

    let mut client = HttpClient::new(&options.target).unwrap();

    match options.action {
        Action::Menu => {
            let target = match params.first() {
                Some(pickup_time) => {
                    format!("{}?pickup_time={}", routes::paths::MENU_ITEMS, pickup_time)
                }
                None => routes::paths::MENU_ITEMS.to_string(),
            };
            let response = client.send("GET", &target, "").unwrap();
            print_response::<api::Envelope<Vec<api::MenuItem>>>(&response);
        }
        Action::Item => {
            let slug = param(params, 0, "slug").unwrap();
            let response = client
                .send("GET", &routes::menu_item_by_slug(slug), "")
                .unwrap();
            print_response::<api::Envelope<api::MenuItem>>(&response);
        }
        Action::Offers => {
            let response = client.send("GET", routes::paths::OFFERS, "").unwrap();
            print_response::<api::Envelope<Vec<api::Offer>>>(&response);
        }
        Action::Offer => {
            let slug = param(params, 0, "slug").unwrap();
            let response = client.send("GET", &routes::offer_by_slug(slug), "").unwrap();
            print_response::<api::Envelope<api::Offer>>(&response);
        }
        Action::Dates => {
            let response = client.send("GET", routes::paths::PICKUP_DATES, "").unwrap();
            print_response::<api::Envelope<Vec<DateOption>>>(&response);
        }
        Action::Slots => {
            let date = param(params, 0, "date").unwrap();
            let target = format!("{}?date={}", routes::paths::PICKUP_SLOTS, date);
            let response = client.send("GET", &target, "").unwrap();
            print_response::<api::Envelope<Vec<TimeSlot>>>(&response);
        }
        Action::Session => {
            // A session id is whatever the frontend would have minted
            let session: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(16)
                .map(char::from)
                .collect();
            println!("{}", session);
        }
        Action::Cart => {
            let session = param(params, 0, "session").unwrap();
            let response = client.send("GET", &routes::cart(session), "").unwrap();
            print_response::<api::Envelope<CartSnapshot>>(&response);
        }
        Action::Add => {
            let session = param(params, 0, "session").unwrap();
            let body = api::AddToCart {
                menu_item_id: numeric_param(params, 1, "menu_item_id").unwrap(),
                name: param(params, 2, "name").unwrap().to_string(),
                image_url: None,
                quantity: numeric_param(params, 3, "quantity").unwrap(),
                price_cents: numeric_param(params, 4, "price_cents").unwrap(),
                special_instructions: String::new(),
                choices: Default::default(),
            };
            let response = client
                .send(
                    "POST",
                    &routes::cart_items(session),
                    &serde_json::to_string(&body).unwrap(),
                )
                .unwrap();
            print_response::<api::Envelope<CartSnapshot>>(&response);
        }
        Action::Quantity => {
            let session = param(params, 0, "session").unwrap();
            let cart_item_id = numeric_param(params, 1, "cart_item_id").unwrap();
            let body = api::QuantityUpdate {
                quantity: numeric_param(params, 2, "quantity").unwrap(),
            };
            let response = client
                .send(
                    "PATCH",
                    &routes::cart_item_by_id(session, cart_item_id),
                    &serde_json::to_string(&body).unwrap(),
                )
                .unwrap();
            print_response::<api::Envelope<CartSnapshot>>(&response);
        }
        Action::Remove => {
            let session = param(params, 0, "session").unwrap();
            let cart_item_id = numeric_param(params, 1, "cart_item_id").unwrap();
            let response = client
                .send("DELETE", &routes::cart_item_by_id(session, cart_item_id), "")
                .unwrap();
            print_response::<serde_json::Value>(&response);
        }
        Action::Clear => {
            let session = param(params, 0, "session").unwrap();
            let response = client.send("DELETE", &routes::cart(session), "").unwrap();
            print_response::<serde_json::Value>(&response);
        }
        Action::Pay => {
            // Anything past the action is treated as a raw JSON order body
            let body = params
                .first()
                .cloned()
                .unwrap_or_else(|| "{}".to_string());
            let response = client
                .send("POST", routes::paths::PAYMENTS, &body)
                .unwrap();
            print_response::<api::PaymentReceipt>(&response);
        }
    }
}
