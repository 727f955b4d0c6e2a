//! System tray icon with "Log Input" and "Quit" items

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use eframe::egui;
use tracing::info;

use crate::constants::tray;
use crate::gui::utils::tray_icon_pixmap;
use crate::input::{SendOutcome, TriggerSender, TriggerSource};

pub struct AppTray {
    pub triggers: TriggerSender,
    pub quit: Arc<AtomicBool>,
    pub ctx: egui::Context,
}

impl AppTray {
    fn request_popup(&self) {
        match self.triggers.send(TriggerSource::Tray) {
            SendOutcome::Queued => info!("Popup requested from tray"),
            SendOutcome::Coalesced | SendOutcome::Closed => {}
        }
    }
}

impl ksni::Tray for AppTray {
    fn id(&self) -> String {
        tray::ID.into()
    }

    fn title(&self) -> String {
        tray::TITLE.into()
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        vec![tray_icon_pixmap()]
    }

    fn activate(&mut self, _x: i32, _y: i32) {
        self.request_popup();
    }

    fn menu(&self) -> Vec<ksni::MenuItem<Self>> {
        use ksni::menu::*;

        vec![
            StandardItem {
                label: "Log Input".into(),
                activate: Box::new(|this: &mut AppTray| this.request_popup()),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: "Quit".into(),
                activate: Box::new(|this: &mut AppTray| {
                    info!("Quit requested from tray");
                    this.quit.store(true, Ordering::SeqCst);
                    this.ctx.request_repaint();
                }),
                ..Default::default()
            }
            .into(),
        ]
    }
}
