//! The single lookup screen: input mode until a result arrives, result mode
//! until the user goes back.

use std::future::Future;

use inquire::{InquireError, Select, Text};
use weathernow_core::{WeatherQueryController, present_now};

use crate::render;

const SEARCH: &str = "Enter city name";
const LOCATE: &str = "Get device location";
const BACK: &str = "Back";
const QUIT: &str = "Quit";

/// Drives `lookup`, printing the pending status line once it is set.
pub async fn with_pending<F: Future>(controller: &WeatherQueryController, lookup: F) -> F::Output {
    tokio::pin!(lookup);

    tokio::select! {
        biased;
        out = &mut lookup => return out,
        _ = tokio::task::yield_now() => {}
    }

    if let Some(line) = controller.state().status() {
        eprintln!("{}", render::status(&line));
    }

    lookup.await
}

/// `Ok(None)` when the user backed out of the prompt.
fn answered<T>(res: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match res {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub async fn run(controller: &WeatherQueryController) -> anyhow::Result<()> {
    loop {
        let state = controller.state();

        if let Some(result) = &state.result {
            println!("\n{}\n", render::weather(&present_now(result), result));

            match answered(Select::new("Weather Now", vec![BACK, QUIT]).prompt())? {
                Some(BACK) => controller.reset(),
                _ => return Ok(()),
            }
            continue;
        }

        if let Some(line) = state.status() {
            println!("{}", render::status(&line));
        }

        match answered(Select::new("Weather Now", vec![SEARCH, LOCATE, QUIT]).prompt())? {
            Some(SEARCH) => {
                let Some(name) =
                    answered(Text::new(SEARCH).with_initial_value(&state.query).prompt())?
                else {
                    continue;
                };

                controller.set_query(&name);
                with_pending(controller, controller.submit_by_name(&name)).await;
            }
            Some(LOCATE) => {
                if let Err(err) = with_pending(controller, controller.submit_by_location()).await {
                    eprintln!("! {err}");
                }
            }
            _ => return Ok(()),
        }
    }
}
