mod chain;
mod components;

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use tokio::sync::mpsc;

use chain::eth::{EthContract, EthLedger};
use chain::{AppCmd, SyncController};
use components::home_page::HomeComponent;
use components::state::ViewState;
use components::AppState;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    HomeComponent {},
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    tracing_subscriber::fmt::init();

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let mut view = use_signal(ViewState::default);
    use_context_provider(|| AppState { view });

    // The command channel is created once per page lifetime; components get
    // the sender through context, the controller owns the receiver.
    let (cmd_tx, cmd_rx_slot) = use_hook(|| {
        let (tx, rx) = mpsc::unbounded_channel::<AppCmd>();
        (tx, Rc::new(RefCell::new(Some(rx))))
    });
    use_context_provider(move || cmd_tx.clone());

    // Start the synchronization controller and apply every patch it emits
    // under a single store write. Dropping this scope drops the controller
    // and with it the event subscriptions.
    use_future(move || {
        let cmd_rx = cmd_rx_slot.borrow_mut().take();
        async move {
            let Some(cmd_rx) = cmd_rx else { return };
            let (patch_tx, mut patch_rx) = mpsc::unbounded_channel();
            let controller = SyncController::new(
                Rc::new(EthContract::default()),
                Rc::new(EthLedger::default()),
                patch_tx,
                cmd_rx,
            );
            spawn(controller.run());

            while let Some(patch) = patch_rx.recv().await {
                patch.apply(&mut view.write());
            }
        }
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/main.css") }
        document::Script { src: asset!("/assets/crowdfunding.js") }
        Router::<Route> {}
    }
}
