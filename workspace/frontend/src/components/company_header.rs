use common::CompanyProfile;
use yew::prelude::*;

use crate::hooks::FetchState;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub state: FetchState<CompanyProfile>,
}

/// Logo, name and description of the selected company.
#[function_component(CompanyHeader)]
pub fn company_header(props: &Props) -> Html {
    let profile = match &props.state {
        FetchState::Success(profile) => profile.clone(),
        FetchState::Error(error) => {
            return html! {
                <div class="alert alert-warning">
                    <span>{error}</span>
                </div>
            };
        }
        FetchState::Loading => {
            return html! {
                <div class="flex justify-center py-4">
                    <span class="loading loading-dots loading-md"></span>
                </div>
            };
        }
        FetchState::NotStarted => CompanyProfile::placeholder(),
    };

    html! {
        <div class="flex flex-col gap-4">
            <div class="flex items-center gap-4">
                {match &profile.logo_url {
                    Some(url) => html! {
                        <img class="h-16 w-16 object-contain" src={url.clone()} alt={profile.name.clone()} />
                    },
                    None => html! {},
                }}
                <h1 class="text-3xl font-bold">{profile.name.clone()}</h1>
            </div>
            <p class="text-base-content/80 whitespace-pre-line">{profile.description.clone()}</p>
        </div>
    }
}
