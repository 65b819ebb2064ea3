//! Kitchen order board and menu availability.

use crate::error::DashboardError;
use agentdesk_api::{KitchenApi, MenuItem, MenuItemUpdate, Order, OrderStatus, OrderUpdate};
use agentdesk_core::{MenuItemId, OrderId};
use agentdesk_crm::apply_optimistic;
use rootcause::prelude::Report;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Category shown for menu items without one.
pub const UNCATEGORIZED: &str = "Other";

/// Orders grouped by kitchen status, plus the menu.
pub struct KitchenBoard<A> {
    api: A,
    orders: Vec<Order>,
    menu: Vec<MenuItem>,
}

impl<A: KitchenApi> KitchenBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            orders: Vec::new(),
            menu: Vec::new(),
        }
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    pub async fn load_orders(&mut self) -> Result<(), Report<DashboardError>> {
        self.orders = self
            .api
            .list_orders()
            .await
            .map_err(DashboardError::request("load orders"))?;
        Ok(())
    }

    pub async fn load_menu(&mut self) -> Result<(), Report<DashboardError>> {
        self.menu = self
            .api
            .list_menu()
            .await
            .map_err(DashboardError::request("load menu"))?;
        Ok(())
    }

    /// One column per status in kitchen flow order. Cancelled orders are
    /// not on the board.
    #[must_use]
    pub fn columns(&self) -> Vec<(OrderStatus, Vec<&Order>)> {
        OrderStatus::FLOW
            .iter()
            .map(|status| {
                let orders = self.orders.iter().filter(|o| o.status == *status).collect();
                (*status, orders)
            })
            .collect()
    }

    /// Moves an order to its next status.
    ///
    /// # Errors
    ///
    /// Refuses served and cancelled orders without a request. A backend
    /// failure restores the previous status.
    pub async fn advance(&mut self, id: &OrderId) -> Result<OrderStatus, Report<DashboardError>> {
        let position = self.order_position(id)?;
        let current = self.orders[position].status;
        let next = current.next().ok_or_else(|| DashboardError::Rejected {
            details: format!("order {id} is already {current}"),
        })?;
        self.set_status(position, next).await?;
        Ok(next)
    }

    /// Cancels an order that has not been served.
    pub async fn cancel(&mut self, id: &OrderId) -> Result<(), Report<DashboardError>> {
        let position = self.order_position(id)?;
        let current = self.orders[position].status;
        if !current.is_cancellable() {
            return Err(DashboardError::Rejected {
                details: format!("order {id} is {current} and cannot be cancelled"),
            }
            .into());
        }
        self.set_status(position, OrderStatus::Cancelled).await
    }

    #[instrument(skip(self))]
    async fn set_status(
        &mut self,
        position: usize,
        status: OrderStatus,
    ) -> Result<(), Report<DashboardError>> {
        let id = self.orders[position].id.clone();
        let update = OrderUpdate { status };
        let updated = apply_optimistic(
            &mut self.orders,
            |orders| orders[position].status = status,
            self.api.update_order(&id, &update),
        )
        .await
        .map_err(DashboardError::request("update order"))?;
        debug!(order_id = %id, status = %updated.status, "order updated");
        self.orders[position] = updated;
        Ok(())
    }

    /// Flips a menu item between available and sold out.
    pub async fn toggle_availability(
        &mut self,
        id: &MenuItemId,
    ) -> Result<bool, Report<DashboardError>> {
        let position = self
            .menu
            .iter()
            .position(|m| &m.id == id)
            .ok_or_else(|| DashboardError::not_loaded("menu item", id))?;
        let available = !self.menu[position].available;
        let update = MenuItemUpdate {
            available: Some(available),
            ..MenuItemUpdate::default()
        };
        let updated = apply_optimistic(
            &mut self.menu,
            |menu| menu[position].available = available,
            self.api.update_menu_item(id, &update),
        )
        .await
        .map_err(DashboardError::request("update menu item"))?;
        self.menu[position] = updated;
        Ok(available)
    }

    /// Menu items by category, categories in name order.
    #[must_use]
    pub fn menu_by_category(&self) -> BTreeMap<&str, Vec<&MenuItem>> {
        let mut categories: BTreeMap<&str, Vec<&MenuItem>> = BTreeMap::new();
        for item in &self.menu {
            let category = item
                .category
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(UNCATEGORIZED);
            categories.entry(category).or_default().push(item);
        }
        categories
    }

    fn order_position(&self, id: &OrderId) -> Result<usize, DashboardError> {
        self.orders
            .iter()
            .position(|o| &o.id == id)
            .ok_or_else(|| DashboardError::not_loaded("order", id))
    }
}
