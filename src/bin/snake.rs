use std::{
    convert::Infallible,
    env,
    sync::{Arc, Mutex, PoisonError},
};

use color_eyre::Result;
use log::{error, info};
use solid_snakey::{
    arena::models::{MapUpdate, Movement, Status},
    strategies::{SolidSnake, Strategy},
};
use warp::{http::Method, Filter};

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

const DEFAULT_PORT: u16 = 6502;

#[derive(Debug)]
struct InternalError;
impl warp::reject::Reject for InternalError {}

type Session = Arc<Mutex<SolidSnake>>;

fn with_session(
    session: Session,
) -> impl Filter<Extract = (Session,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&session))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();

    #[cfg(debug_assertions)]
    info!("running in debug mode");

    #[cfg(not(debug_assertions))]
    info!("running in release mode");

    let port = env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let session: Session = Arc::new(Mutex::new(SolidSnake::default()));

    let cors = warp::cors()
        .allow_method(Method::GET)
        .allow_method(Method::POST)
        .allow_header("content-type")
        .allow_any_origin();

    let logging = warp::log(NAME);

    let healthz = warp::get().and(warp::path::end().map(|| {
        warp::reply::json(&Status {
            name:    NAME.to_owned(),
            author:  AUTHOR.to_owned(),
            version: VERSION.to_owned(),
        })
    }));

    let start = warp::post()
        .and(warp::path("start"))
        .and(with_session(Arc::clone(&session)))
        .map(|session: Session| {
            session
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .reset();
            info!("session reset for a new game");
            String::new()
        });

    let do_move = warp::post()
        .and(warp::path("map-update"))
        .and(warp::body::json())
        .and(with_session(session))
        .and_then(|update: MapUpdate, session: Session| async move {
            let decision = session
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get_movement(&update);

            decision
                .map(|decision| {
                    warp::reply::json(&Movement {
                        direction: decision.direction,
                        game_tick: update.game_tick,
                        will_eat:  decision.will_eat,
                    })
                })
                .map_err(|e| {
                    error!("failed to get move: {}", e);
                    warp::reject::custom(InternalError)
                })
        });

    let api = healthz.or(start).or(do_move).with(cors).with(logging);

    info!("listening on port {port}");
    warp::serve(api).run(([0, 0, 0, 0], port)).await;

    Ok(())
}
