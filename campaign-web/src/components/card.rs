//! Wallet card: connection status, connect button, the create-campaign form and the
//! campaign it created.

use leptos::prelude::*;
use leptos::task::spawn_local;
use lib_core::Config;
use lib_solana::CampaignProgram;
use lib_wallet::{CampaignCard, CampaignSubmitter, CardView, ConnectionManager};
use std::rc::Rc;

use crate::services::phantom::PhantomWallet;
use crate::services::rpc::JsonRpcLedger;

type PhantomCard = CampaignCard<PhantomWallet, PhantomWallet, JsonRpcLedger>;

fn build_card(config: &Config) -> PhantomCard {
    let program = CampaignProgram::from_config(config).unwrap_or_else(|e| {
        log::error!("{}; using the built-in program id", e);
        CampaignProgram::default()
    });

    CampaignCard::new(
        ConnectionManager::new(PhantomWallet, config.network_label()),
        CampaignSubmitter::new(PhantomWallet, JsonRpcLedger::from_config(config), program),
    )
}

#[component]
pub fn Card() -> impl IntoView {
    let card = Rc::new(build_card(&Config::default()));
    let card_view = RwSignal::new(card.view());
    let revision = RwSignal::new(0u64);

    // Transitions happen mid-await; bump a revision so the effect below re-reads the card.
    card.manager()
        .on_transition(move |_| revision.update(|r| *r += 1));

    let stored = StoredValue::new_local(card);
    let refresh = move || {
        if let Some(card) = stored.try_get_value() {
            card_view.set(card.view());
        }
    };

    Effect::new(move |_| {
        revision.track();
        refresh();
    });

    spawn_local(async move {
        let card = stored.get_value();
        card.on_mount().await;
        refresh();
    });

    let on_toggle = move |_| {
        spawn_local(async move {
            let card = stored.get_value();
            card.on_toggle().await;
            refresh();
        });
    };

    let on_submit = move |_| {
        spawn_local(async move {
            let card = stored.get_value();
            card.on_submit().await;
            refresh();
        });
    };

    view! {
        <div class="campaign-card">
            <h2 class="wallet-name">{move || card_view.with(|v| v.display_name.clone())}</h2>
            <p class="status">{move || card_view.with(|v| v.status_text.clone())}</p>
            <p class="address">{move || card_view.with(|v| v.address_text.clone())}</p>
            <p class="network">{move || card_view.with(|v| v.network_text.clone())}</p>

            <button class="connect-button" on:click=on_toggle>
                {move || card_view.with(|v| v.button_label)}
            </button>

            <Show when=move || card_view.with(|v: &CardView| v.form_visible)>
                <form class="campaign-form" on:submit=|ev| ev.prevent_default()>
                    <input
                        type="text"
                        placeholder="Campaign name"
                        prop:value=move || card_view.with(|v| v.draft.name.clone())
                        on:input=move |ev| {
                            stored.with_value(|c| c.set_name(event_target_value(&ev)));
                            refresh();
                        }
                    />
                    <input
                        type="text"
                        placeholder="Description"
                        prop:value=move || card_view.with(|v| v.draft.description.clone())
                        on:input=move |ev| {
                            stored.with_value(|c| c.set_description(event_target_value(&ev)));
                            refresh();
                        }
                    />
                    <input
                        type="text"
                        inputmode="decimal"
                        placeholder="Target amount (SOL)"
                        prop:value=move || card_view.with(|v| v.draft.target_amount.clone())
                        on:input=move |ev| {
                            stored.with_value(|c| c.set_target_amount(event_target_value(&ev)));
                            refresh();
                        }
                    />
                    <button
                        type="button"
                        on:click=on_submit
                        disabled=move || card_view.with(|v| v.submitting)
                    >
                        "Create Campaign"
                    </button>
                </form>
            </Show>

            {move || {
                card_view
                    .with(|v| v.last_transaction.clone())
                    .map(|tx| {
                        view! {
                            <p class="transaction">
                                "Campaign " {tx.campaign_address} " created in " {tx.transaction_id}
                            </p>
                        }
                    })
            }}

            {move || {
                card_view
                    .with(|v| v.campaign.clone())
                    .map(|campaign| {
                        view! {
                            <div class="campaign-summary">
                                <h3>{campaign.name}</h3>
                                <p class="description">{campaign.description}</p>
                                <p class="funds">
                                    {campaign.raised} " / " {campaign.target} " SOL ("
                                    {campaign.progress} "%)"
                                </p>
                            </div>
                        }
                    })
            }}
        </div>
    }
}
