use chrono::NaiveDate;
use common::{ChartResponse, CompanyProfile};
use std::future::Future;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api_client::dashboard::{
    get_company, get_forecast_chart, get_indicator_chart, get_price_chart,
};
use crate::components::chart_panel::ChartPanel;
use crate::components::company_header::CompanyHeader;
use crate::hooks::FetchState;
use crate::settings;

fn input_value(e: &InputEvent) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Runs `fetch` and writes its outcome into `target`.
fn load_into<T, Fut>(target: UseStateHandle<FetchState<T>>, fetch: Fut)
where
    T: 'static,
    Fut: Future<Output = Result<T, String>> + 'static,
{
    target.set(FetchState::Loading);
    wasm_bindgen_futures::spawn_local(async move {
        target.set(fetch.await.into());
    });
}

/// The single dashboard page: controls on the left, output regions on the right.
#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let ticker = use_state(String::new);
    let start_date = use_state(String::new);
    let end_date = use_state(String::new);
    let days = use_state(|| settings::get_settings().default_forecast_days.to_string());

    let company = use_state(FetchState::<CompanyProfile>::default);
    let price_chart = use_state(FetchState::<ChartResponse>::default);
    let indicator_chart = use_state(FetchState::<ChartResponse>::default);
    let forecast_chart = use_state(FetchState::<ChartResponse>::default);

    let on_ticker = {
        let ticker = ticker.clone();
        Callback::from(move |e: InputEvent| ticker.set(input_value(&e)))
    };
    let on_start = {
        let start_date = start_date.clone();
        Callback::from(move |e: InputEvent| start_date.set(input_value(&e)))
    };
    let on_end = {
        let end_date = end_date.clone();
        Callback::from(move |e: InputEvent| end_date.set(input_value(&e)))
    };
    let on_days = {
        let days = days.clone();
        Callback::from(move |e: InputEvent| days.set(input_value(&e)))
    };

    let on_submit = {
        let ticker = ticker.clone();
        let company = company.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let symbol = ticker.trim().to_string();
            log::debug!("Looking up company {:?}", symbol);
            load_into(company.clone(), async move { get_company(&symbol).await });
        })
    };

    let on_price = {
        let (ticker, start_date, end_date) = (ticker.clone(), start_date.clone(), end_date.clone());
        let price_chart = price_chart.clone();
        Callback::from(move |_: MouseEvent| {
            let symbol = ticker.trim().to_string();
            let (start, end) = (parse_date(&start_date), parse_date(&end_date));
            load_into(price_chart.clone(), async move {
                get_price_chart(&symbol, start, end).await
            });
        })
    };

    let on_indicator = {
        let (ticker, start_date, end_date) = (ticker.clone(), start_date.clone(), end_date.clone());
        let indicator_chart = indicator_chart.clone();
        Callback::from(move |_: MouseEvent| {
            let symbol = ticker.trim().to_string();
            let (start, end) = (parse_date(&start_date), parse_date(&end_date));
            load_into(indicator_chart.clone(), async move {
                get_indicator_chart(&symbol, start, end).await
            });
        })
    };

    let on_forecast = {
        let (ticker, days) = (ticker.clone(), days.clone());
        let forecast_chart = forecast_chart.clone();
        Callback::from(move |_: MouseEvent| {
            let symbol = ticker.trim().to_string();
            match days.trim().parse::<u32>() {
                Ok(count) if count >= 1 => {
                    load_into(forecast_chart.clone(), async move {
                        get_forecast_chart(&symbol, count).await
                    });
                }
                _ => forecast_chart.set(FetchState::Error(
                    "Number of days must be a whole number of at least 1".to_string(),
                )),
            }
        })
    };

    let busy = company.is_loading()
        || price_chart.is_loading()
        || indicator_chart.is_loading()
        || forecast_chart.is_loading();
    let have_ticker = !ticker.trim().is_empty();

    html! {
        <div class="flex flex-col lg:flex-row gap-6 p-6">
            <aside class="card bg-base-100 shadow lg:w-80 shrink-0">
                <div class="card-body gap-4">
                    <p class="text-xl font-semibold">{"Stock Dash App"}</p>

                    <form class="flex gap-2" onsubmit={on_submit}>
                        <input
                            class="input input-bordered w-full"
                            placeholder="Input stock code"
                            value={(*ticker).clone()}
                            oninput={on_ticker}
                        />
                        <button class="btn btn-primary" type="submit">{"Submit"}</button>
                    </form>

                    <div class="flex gap-2">
                        <input class="input input-bordered w-full" type="date"
                            value={(*start_date).clone()} oninput={on_start} />
                        <input class="input input-bordered w-full" type="date"
                            value={(*end_date).clone()} oninput={on_end} />
                    </div>

                    <div class="flex gap-2">
                        <button class="btn btn-outline flex-1" onclick={on_price}
                            disabled={!have_ticker}>{"Stock price"}</button>
                        <button class="btn btn-outline flex-1" onclick={on_indicator}
                            disabled={!have_ticker}>{"Indicators"}</button>
                    </div>

                    <div class="flex gap-2">
                        <input
                            class="input input-bordered w-full"
                            type="number"
                            min="1"
                            placeholder="number of days"
                            value={(*days).clone()}
                            oninput={on_days}
                        />
                        <button class="btn btn-outline" onclick={on_forecast}
                            disabled={!have_ticker}>{"Forecast"}</button>
                    </div>

                    if busy {
                        <progress class="progress progress-primary w-full"></progress>
                    }
                </div>
            </aside>

            <section class="flex-1 flex flex-col gap-6">
                <CompanyHeader state={(*company).clone()} />
                <ChartPanel heading="Stock price" div_id="graphs-content" state={(*price_chart).clone()} />
                <ChartPanel heading="Indicators" div_id="main-content" state={(*indicator_chart).clone()} />
                <ChartPanel heading="Forecast" div_id="forecast-content" state={(*forecast_chart).clone()} />
            </section>
        </div>
    }
}
