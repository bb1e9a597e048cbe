//! System tray icon with state-based updates.
//!
//! Manages a system tray icon with three states (Idle, Recording, Playing)
//! and a context menu to open the recordings folder or exit.

use crate::{AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const ICON_SIZE: u32 = 32;

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    recordings_item_id: MenuId,
    exit_item_id: MenuId,
}

impl TrayManager {
    /// Create a new tray manager with initial state.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let recordings_item = MenuItem::new("Open recordings folder", true, None);
        let exit_item = MenuItem::new("Exit", true, None);

        let recordings_id = recordings_item.id().clone();
        let exit_id = exit_item.id().clone();

        menu.append(&recordings_item)
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to add recordings menu: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        menu.append(&PredefinedMenuItem::separator())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to add menu separator: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        menu.append(&exit_item).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to add exit menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let state = TrayIconState::Idle;
        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(state.tooltip())
            .with_menu(Box::new(menu))
            .with_icon(Self::build_icon(state)?)
            .build()
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            recordings_item_id: recordings_id,
            exit_item_id: exit_id,
        })
    }

    /// Update the tray icon state with new icon and tooltip.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        self.tray_icon
            .set_icon(Some(Self::build_icon(state)?))
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(state.tooltip()))
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Draw a filled disc in the state colour.
    #[track_caller]
    fn build_icon(state: TrayIconState) -> AppResult<Icon> {
        let rgba = icon_pixels(state, ICON_SIZE);

        Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Get the recordings folder menu item ID.
    pub fn recordings_item_id(&self) -> &MenuId {
        &self.recordings_item_id
    }

    /// Get the exit menu item ID.
    pub fn exit_item_id(&self) -> &MenuId {
        &self.exit_item_id
    }
}

/// RGBA pixels of a `size` square holding a disc in the state colour on a
/// transparent background.
pub(crate) fn icon_pixels(state: TrayIconState, size: u32) -> Vec<u8> {
    let [r, g, b] = state.color();
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0 - 1.0;

    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let alpha = if dx * dx + dy * dy <= radius * radius {
                0xff
            } else {
                0x00
            };
            rgba.extend_from_slice(&[r, g, b, alpha]);
        }
    }
    rgba
}
