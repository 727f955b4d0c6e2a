//! Popup window implemented with egui/eframe and ksni system tray support

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use eframe::{NativeOptions, egui};
use tracing::{debug, info, warn};

#[cfg(target_os = "linux")]
use ksni::TrayMethods;

use crate::activation::{WindowActivator, platform_activator};
use crate::config::{AppSettings, Config};
use crate::constants::gui::{
    CLOCK_REFRESH_MS, IDLE_POLL_MS, LABEL_WINDOW_HEIGHT, LABEL_WINDOW_MARGIN,
};
use crate::constants::input::TRIGGER_CHANNEL_CAPACITY;
use crate::constants::x11::ACTIVATION_ATTEMPTS;
use crate::error::{AppError, report};
use crate::gui::flow::{PopupFlow, Screen, ViewChange};
use crate::gui::input_window::{self, InputAction};
use crate::gui::label_window::{self, LabelSelection};
use crate::gui::style::Theme;
#[cfg(target_os = "linux")]
use crate::gui::tray::AppTray;
use crate::gui::utils::window_icon;
use crate::input::{HotkeyBinding, HotkeyListener, TriggerReceiver, trigger_channel};
#[cfg(target_os = "linux")]
use crate::input::TriggerSender;
use crate::logger::Logger;

struct UrgeApp {
    logger: Arc<Logger>,
    settings: AppSettings,
    theme: Theme,
    flow: PopupFlow,
    triggers: TriggerReceiver,
    activator: Box<dyn WindowActivator>,

    /// Frames left in which to retry WM activation of a freshly shown popup
    pending_activation: u8,
    focus_input: bool,
    quit: Arc<AtomicBool>,
    _hotkey: Option<HotkeyListener>,
    #[cfg(target_os = "linux")]
    shutdown_signal: Arc<tokio::sync::Notify>,
}

impl UrgeApp {
    fn new(cc: &eframe::CreationContext<'_>, config: &Config, logger: Arc<Logger>) -> Self {
        info!("Initializing popup window");

        let ctx = cc.egui_ctx.clone();
        let (sender, receiver) = trigger_channel(TRIGGER_CHANNEL_CAPACITY);
        let sender = sender.with_waker(move || ctx.request_repaint());

        let hotkey = match HotkeyListener::start(HotkeyBinding::trigger(), sender.clone()) {
            Ok(listener) => {
                logger.info(&format!(
                    "Global hotkey {} registered via {}",
                    listener.binding(),
                    listener.backend_name()
                ));
                Some(listener)
            }
            Err(err) => {
                report(&err, Some(logger.as_ref()));
                logger.warning("Hotkey unavailable, use the tray menu to log input");
                None
            }
        };

        let quit = Arc::new(AtomicBool::new(false));

        #[cfg(target_os = "linux")]
        let shutdown_signal = spawn_tray(sender, quit.clone(), cc.egui_ctx.clone());
        #[cfg(not(target_os = "linux"))]
        drop(sender);

        let labels = LabelSelection::from_labels(config.labels());
        let keymap = labels.keymap();
        if keymap.is_empty() {
            warn!("No usable labels configured, only Escape will work in the label window");
        } else {
            info!(labels = keymap.len(), "Label shortcuts ready");
        }

        let activator = platform_activator();
        info!(activator = activator.name(), "Window activation ready");

        Self {
            logger,
            settings: config.app(),
            theme: Theme::from_settings(&config.ui()),
            flow: PopupFlow::new(labels),
            triggers: receiver,
            activator,
            pending_activation: 0,
            focus_input: false,
            quit,
            _hotkey: hotkey,
            #[cfg(target_os = "linux")]
            shutdown_signal,
        }
    }

    fn input_size(&self) -> egui::Vec2 {
        let mut height = self.settings.window_height as f32;
        if self.flow.last_error().is_some() {
            height += self.theme.font_normal * 2.0;
        }
        egui::vec2(self.settings.window_width as f32, height)
    }

    /// Translate a flow transition into viewport commands
    fn apply(&mut self, ctx: &egui::Context, change: ViewChange) {
        match change {
            ViewChange::None => {}
            ViewChange::ShowLabels => {
                let size = egui::vec2(self.settings.window_width as f32, LABEL_WINDOW_HEIGHT);
                ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(size));
                if let Some(title) = self.flow.title() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
                }
                self.show(ctx);
            }
            ViewChange::ShowInput { title } => {
                ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(self.input_size()));
                ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
                self.focus_input = true;
                self.show(ctx);
            }
            ViewChange::Refocus => {
                self.focus_input = matches!(self.flow.screen(), Screen::Input(_));
                self.show(ctx);
            }
            ViewChange::Hide => {
                self.pending_activation = 0;
                self.focus_input = false;
                ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
            }
        }
    }

    fn show(&mut self, ctx: &egui::Context) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
        ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
        self.pending_activation = ACTIVATION_ATTEMPTS;
    }

    /// The WM may not have mapped the window on the frame it was shown,
    /// so activation is retried for a few frames.
    fn retry_activation(&mut self, ctx: &egui::Context) {
        if self.pending_activation == 0 {
            return;
        }
        let Some(title) = self.flow.title() else {
            self.pending_activation = 0;
            return;
        };

        match self.activator.activate(&title) {
            Ok(()) => {
                debug!(title = %title, activator = self.activator.name(), "Popup activated");
                self.pending_activation = 0;
            }
            Err(e) => {
                self.pending_activation -= 1;
                if self.pending_activation == 0 {
                    warn!(error = %e, title = %title, "Could not activate popup window");
                } else {
                    ctx.request_repaint_after(Duration::from_millis(50));
                }
            }
        }
    }

    fn render(&mut self, ctx: &egui::Context) -> ViewChange {
        let theme = self.theme;
        let margin = match self.flow.screen() {
            Screen::Labels => egui::Margin::same(LABEL_WINDOW_MARGIN),
            _ => egui::Margin::ZERO,
        };
        let frame = egui::Frame::new().fill(theme.background).inner_margin(margin);

        let logger = &self.logger;
        let flow = &mut self.flow;
        let focus_input = std::mem::take(&mut self.focus_input);

        egui::CentralPanel::default()
            .frame(frame)
            .show(ctx, |ui| {
                if let Some(form) = flow.input_form_mut() {
                    let action = input_window::ui(ui, form, &theme, focus_input);
                    if let Some(message) = flow.last_error() {
                        ui.colored_label(egui::Color32::LIGHT_RED, message);
                    }
                    match action {
                        InputAction::Submit => flow.on_submit(logger),
                        InputAction::Cancel => flow.on_input_cancel(logger),
                        InputAction::None => ViewChange::None,
                    }
                } else if flow.is_visible() {
                    let action = label_window::ui(ui, flow.labels_mut(), &theme);
                    flow.on_label_action(action, logger)
                } else {
                    ViewChange::None
                }
            })
            .inner
    }
}

impl eframe::App for UrgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle quit request from tray menu
        if self.quit.load(Ordering::SeqCst) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        while let Some(event) = self.triggers.try_recv() {
            let change = self.flow.on_trigger(event.source, &self.logger);
            self.apply(ctx, change);
        }

        // Closing the window only hides the popup; the tray's Quit exits
        if ctx.input(|i| i.viewport().close_requested()) {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            let change = self.flow.on_close_requested(&self.logger);
            self.apply(ctx, change);
        }

        let had_error = self.flow.last_error().is_some();
        let change = self.render(ctx);
        if !had_error && self.flow.last_error().is_some() {
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(self.input_size()));
        }
        self.apply(ctx, change);

        self.retry_activation(ctx);

        let refresh = match self.flow.screen() {
            Screen::Input(_) => CLOCK_REFRESH_MS,
            _ => IDLE_POLL_MS,
        };
        ctx.request_repaint_after(Duration::from_millis(refresh));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Signal tray thread to shutdown
        #[cfg(target_os = "linux")]
        {
            self.shutdown_signal.notify_one();
            info!("Signaled tray thread to shutdown");
        }

        info!("Popup window exiting");
    }
}

/// Run the tray on its own thread with a current-thread Tokio runtime
#[cfg(target_os = "linux")]
fn spawn_tray(
    triggers: TriggerSender,
    quit: Arc<AtomicBool>,
    ctx: egui::Context,
) -> Arc<tokio::sync::Notify> {
    use tracing::error;

    let shutdown_signal = Arc::new(tokio::sync::Notify::new());
    let shutdown_clone = shutdown_signal.clone();

    let spawned = std::thread::Builder::new()
        .name("tray".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!(error = %e, "Failed to build Tokio runtime for tray");
                    return;
                }
            };

            runtime.block_on(async move {
                let tray = AppTray { triggers, quit, ctx };
                match tray.spawn().await {
                    Ok(handle) => {
                        info!("Tray icon created via ksni/D-Bus");
                        shutdown_clone.notified().await;
                        handle.shutdown().await;
                    }
                    Err(e) => {
                        error!(error = ?e, "Failed to create tray icon (D-Bus unavailable?)");
                    }
                }
            });
        });

    if let Err(e) = spawned {
        error!(error = %e, "Failed to spawn tray thread");
    }

    shutdown_signal
}

/// Open the (initially hidden) popup window and run the UI loop until Quit
pub fn run_gui(config: &Config, logger: Arc<Logger>) -> Result<(), AppError> {
    let settings = config.app();

    let viewport = egui::ViewportBuilder::default()
        .with_title(settings.name.clone())
        .with_app_id(crate::constants::tray::ID)
        .with_inner_size([settings.window_width as f32, settings.window_height as f32])
        .with_decorations(false)
        .with_resizable(false)
        .with_visible(false)
        .with_window_level(egui::WindowLevel::AlwaysOnTop)
        .with_icon(window_icon());

    let options = NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &settings.name,
        options,
        Box::new(move |cc| Ok(Box::new(UrgeApp::new(cc, config, logger)))),
    )
    .map_err(|err| AppError::UiInit(anyhow!("Failed to launch popup window: {err}")))
}
