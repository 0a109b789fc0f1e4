use common::ChartResponse;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::hooks::FetchState;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly)]
    fn newPlot(div_id: &str, data: JsValue, layout: JsValue);
}

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Heading shown above the panel
    pub heading: AttrValue,
    /// DOM id Plotly draws into; must be unique on the page
    pub div_id: AttrValue,
    pub state: FetchState<ChartResponse>,
}

#[function_component(ChartPanel)]
pub fn chart_panel(props: &Props) -> Html {
    html! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h3 class="card-title text-lg">{props.heading.clone()}</h3>

                {match &props.state {
                    FetchState::Loading => html! {
                        <div class="flex justify-center items-center py-8">
                            <span class="loading loading-spinner loading-lg"></span>
                        </div>
                    },
                    FetchState::Error(error) => html! {
                        <div class="alert alert-error">
                            <span>{error}</span>
                        </div>
                    },
                    FetchState::Success(chart) => match &chart.spec.empty_message {
                        Some(message) => html! {
                            <div class="text-center py-8 text-gray-500">
                                <p class="font-semibold">{chart.spec.title.clone()}</p>
                                <p class="text-sm mt-2">{message}</p>
                            </div>
                        },
                        None => html! {
                            <PlotlyFigure div_id={props.div_id.clone()} figure={chart.figure.clone()} />
                        },
                    },
                    FetchState::NotStarted => html! { <></> },
                }}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct PlotlyFigureProps {
    div_id: AttrValue,
    figure: serde_json::Value,
}

/// Hands a server-rendered Plotly figure to Plotly.js.
#[function_component(PlotlyFigure)]
fn plotly_figure(props: &PlotlyFigureProps) -> Html {
    let container_ref = use_node_ref();

    use_effect_with(
        (container_ref.clone(), props.figure.clone(), props.div_id.clone()),
        move |(container_ref, figure, div_id)| {
            if let Some(element) = container_ref.cast::<HtmlElement>() {
                element.set_id(div_id);

                match (to_js(&figure["data"]), to_js(&figure["layout"])) {
                    (Ok(data), Ok(layout)) => newPlot(div_id, data, layout),
                    (Err(e), _) | (_, Err(e)) => {
                        log::error!("Failed to hand figure to Plotly: {:?}", e)
                    }
                }
            }
            || ()
        },
    );

    html! {
        <div ref={container_ref} style="width:100%; min-height:400px;"></div>
    }
}

fn to_js(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(&value.to_string())
}
