// storefront/src/client/telegram.rs

//! Bridge to the Telegram Mini App host. The host is an injected capability;
//! without one (a plain browser, tests) every call is a no-op.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactStyle {
  Light,
  Medium,
  Heavy,
  Rigid,
  Soft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
  Error,
  Success,
  Warning,
}

/// Token returned when a back-button handler is registered; pass it back to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u64);

pub type BackButtonHandler = Box<dyn Fn() + Send + Sync>;

/// What the host SDK exposes: `BackButton` and `HapticFeedback`.
pub trait WebAppHost: Send + Sync {
  fn show_back_button(&self);
  fn hide_back_button(&self);
  fn on_back_button_click(&self, handler: BackButtonHandler) -> HandlerId;
  fn off_back_button_click(&self, id: HandlerId);

  fn impact_occurred(&self, style: ImpactStyle);
  fn notification_occurred(&self, kind: NotificationType);
  fn selection_changed(&self);
}

#[derive(Clone, Default)]
pub struct TelegramBridge {
  host: Option<Arc<dyn WebAppHost>>,
}

impl fmt::Debug for TelegramBridge {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TelegramBridge").field("attached", &self.is_attached()).finish()
  }
}

impl TelegramBridge {
  pub fn new(host: Arc<dyn WebAppHost>) -> Self {
    Self { host: Some(host) }
  }

  /// A bridge with no host behind it.
  pub fn detached() -> Self {
    Self { host: None }
  }

  pub fn is_attached(&self) -> bool {
    self.host.is_some()
  }

  pub fn show_back_button(&self) {
    if let Some(host) = &self.host {
      host.show_back_button();
    }
  }

  pub fn hide_back_button(&self) {
    if let Some(host) = &self.host {
      host.hide_back_button();
    }
  }

  /// `None` when detached: there is nothing to unregister later.
  pub fn on_back_button_click<F>(&self, handler: F) -> Option<HandlerId>
  where
    F: Fn() + Send + Sync + 'static,
  {
    self.host.as_ref().map(|host| host.on_back_button_click(Box::new(handler)))
  }

  pub fn off_back_button_click(&self, id: HandlerId) {
    if let Some(host) = &self.host {
      host.off_back_button_click(id);
    }
  }

  pub fn impact(&self, style: ImpactStyle) {
    if let Some(host) = &self.host {
      host.impact_occurred(style);
    }
  }

  pub fn notify(&self, kind: NotificationType) {
    if let Some(host) = &self.host {
      host.notification_occurred(kind);
    }
  }

  pub fn selection_changed(&self) {
    if let Some(host) = &self.host {
      host.selection_changed();
    }
  }

  /// Shows the back button wired to `handler` until the guard is dropped.
  pub fn back_button<F>(&self, handler: F) -> BackButtonGuard
  where
    F: Fn() + Send + Sync + 'static,
  {
    let handler_id = self.on_back_button_click(handler);
    self.show_back_button();
    BackButtonGuard {
      bridge: self.clone(),
      handler_id,
    }
  }
}

/// Unregisters its handler and hides the back button on drop.
#[must_use = "the back button is hidden again as soon as the guard is dropped"]
pub struct BackButtonGuard {
  bridge: TelegramBridge,
  handler_id: Option<HandlerId>,
}

impl Drop for BackButtonGuard {
  fn drop(&mut self) {
    if let Some(id) = self.handler_id.take() {
      self.bridge.off_back_button_click(id);
    }
    self.bridge.hide_back_button();
  }
}
