//! Order Service
//!
//! Service-order lifecycle on top of the record pass-through: state history,
//! transitions with client notification, quotation totals, invoices, share
//! links and the public tracking view.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use super::record_service::{check, RecordError, RecordService, Upserted};
use crate::application::dto::{
    QuotationLine, QuotationResponse, ShareLinkResponse, StateTransitionRequest, TrackingEntry,
    TrackingResponse, TrackingVehicle,
};
use crate::config::Settings;
use crate::domain::entities::Document;
use crate::domain::{
    Client, Collection, EmailMessage, Mailer, OrderState, ServiceOrder, StateHistoryEntry,
    StoreError, Vehicle,
};
use crate::infrastructure::pdf::{render_invoice, InvoiceDocument, InvoiceLine};
use crate::shared::json::{document_id, scalar_to_string};

const NOT_AVAILABLE: &str = "N/A";

pub struct OrderService {
    records: RecordService,
    mailer: Arc<dyn Mailer>,
    settings: Arc<Settings>,
}

impl OrderService {
    pub fn new(records: RecordService, mailer: Arc<dyn Mailer>, settings: Arc<Settings>) -> Self {
        Self {
            records,
            mailer,
            settings,
        }
    }

    pub async fn list(&self, filters: &[(String, String)]) -> Result<Vec<Value>, RecordError> {
        self.records.list(Collection::Orders, filters).await
    }

    pub async fn get(&self, id: &str) -> Result<Value, RecordError> {
        self.records.get(Collection::Orders, id).await
    }

    /// New orders start in reception unless told otherwise.
    pub async fn create(&self, mut order: ServiceOrder) -> Result<Value, RecordError> {
        check(&order)?;
        let state = *order.state.get_or_insert(OrderState::default());
        order.created_at.get_or_insert_with(now);

        let created = self.records.create(order).await?;
        let id = document_id(&created)
            .ok_or_else(|| RecordError::Internal("document store returned an order without id".into()))?;

        self.append_history(StateHistoryEntry::record(&id, None, state)).await?;
        tracing::info!(order_id = %id, state = %state, "Order created");
        Ok(created)
    }

    /// Update-or-create. A body without `state` keeps the current one; a new
    /// state (or a new order) is written to the history.
    ///
    /// The stored order is read as raw JSON so a row with an unknown state can
    /// still be replaced.
    pub async fn upsert(&self, id: &str, mut order: ServiceOrder) -> Result<Upserted, RecordError> {
        let existing = self.records.lookup(Collection::Orders, id).await?;
        let previous = existing.as_ref().and_then(|doc| match stored_state(doc) {
            Ok(state) => Some(state.unwrap_or_default()),
            Err(e) => {
                tracing::warn!(order_id = %id, error = %e, "Stored order has an unknown state");
                None
            }
        });
        let state = *order.state.get_or_insert(previous.unwrap_or_default());

        match &existing {
            Some(existing) => {
                if order.created_at.is_none() {
                    order.created_at = existing.get("createdAt").and_then(Value::as_str).map(str::to_string);
                }
                if order.photos.is_empty() {
                    order.photos = existing
                        .get("photos")
                        .and_then(|photos| serde_json::from_value(photos.clone()).ok())
                        .unwrap_or_default();
                }
            }
            None => {
                order.created_at.get_or_insert_with(now);
            }
        }

        let outcome = self.records.upsert(id, order).await?;
        if previous != Some(state) {
            self.append_history(StateHistoryEntry::record(id, previous, state)).await?;
        }
        Ok(outcome)
    }

    /// Move an order through its lifecycle and tell the client about it.
    ///
    /// The history entry is written before the state so a failed history write
    /// leaves the order untouched.
    pub async fn transition(&self, id: &str, request: StateTransitionRequest) -> Result<Value, RecordError> {
        let target = request.state.ok_or(RecordError::MissingField("state"))?;
        let order = self.records.get(Collection::Orders, id).await?;
        let current = stored_state(&order)
            .map_err(|_| {
                RecordError::Conflict(format!(
                    "Order {} has an unknown state {} and cannot move to {}",
                    id,
                    order.get("state").unwrap_or(&Value::Null),
                    target
                ))
            })?
            .unwrap_or_default();

        if !current.can_transition_to(target) {
            return Err(RecordError::Conflict(format!(
                "Order {} cannot move from {} to {}",
                id, current, target
            )));
        }

        let mut entry = StateHistoryEntry::record(id, Some(current), target);
        entry.notes = request.notes;
        entry.changed_by = request.changed_by;
        let entry_id = self.append_history(entry).await?;

        let updated = match self
            .records
            .patch(Collection::Orders, id, json!({ "state": target }))
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                self.discard_history(id, entry_id.as_deref()).await;
                return Err(e);
            }
        };

        tracing::info!(order_id = %id, from = %current, to = %target, "Order state changed");
        self.notify_state_change(id, &order, target).await;
        Ok(updated)
    }

    /// History entries of an order, oldest first.
    pub async fn history(&self, id: &str) -> Result<Vec<Value>, RecordError> {
        self.records.get(Collection::Orders, id).await?;

        let mut entries = self
            .records
            .list(Collection::StateHistory, &order_filter(id))
            .await?;
        entries.sort_by(|a, b| changed_at(a).cmp(changed_at(b)));
        Ok(entries)
    }

    pub async fn quotation(&self, id: &str) -> Result<QuotationResponse, RecordError> {
        let order: ServiceOrder = self.records.fetch(id).await?;
        let totals = order.totals();
        let quotation = order.quotation.unwrap_or_default();

        Ok(QuotationResponse {
            order_id: id.to_string(),
            items: quotation
                .items
                .into_iter()
                .map(|item| QuotationLine {
                    line_total: item.line_total(),
                    item,
                })
                .collect(),
            apply_tax: quotation.apply_tax,
            notes: quotation.notes,
            totals,
        })
    }

    /// Render the order's invoice as PDF.
    pub async fn invoice(&self, id: &str) -> Result<Vec<u8>, RecordError> {
        let order: ServiceOrder = self.records.fetch(id).await?;
        let (client, vehicle) = tokio::try_join!(
            self.related::<Client>(order.client_id.as_deref()),
            self.related::<Vehicle>(order.vehicle_id.as_deref()),
        )?;

        let invoice = build_invoice(id, &order, client.as_ref(), vehicle.as_ref());
        let shop = self.settings.shop.clone();

        let pdf = tokio::task::spawn_blocking(move || render_invoice(&invoice, &shop))
            .await
            .map_err(|e| RecordError::Internal(e.to_string()))?
            .map_err(|e| RecordError::Internal(e.to_string()))?;

        tracing::debug!(order_id = %id, bytes = pdf.len(), "Invoice rendered");
        Ok(pdf)
    }

    pub async fn share_link(&self, id: &str) -> Result<ShareLinkResponse, RecordError> {
        self.records.get(Collection::Orders, id).await?;
        Ok(ShareLinkResponse {
            order_id: id.to_string(),
            url: self.tracking_url(id),
        })
    }

    /// Delete an order and its history.
    pub async fn delete(&self, id: &str) -> Result<(), RecordError> {
        self.records.delete(Collection::Orders, id).await?;

        let entries = self
            .records
            .list(Collection::StateHistory, &order_filter(id))
            .await?;
        let mut removed = 0;
        for entry_id in entries.iter().filter_map(document_id) {
            match self.records.delete(Collection::StateHistory, &entry_id).await {
                Ok(()) => removed += 1,
                Err(RecordError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        tracing::info!(order_id = %id, history_removed = removed, "Order deleted");
        Ok(())
    }

    /// Public progress view: state, vehicle and history, nothing else.
    pub async fn tracking(&self, id: &str) -> Result<TrackingResponse, RecordError> {
        let order: ServiceOrder = self.records.fetch(id).await?;
        let vehicle = self.related::<Vehicle>(order.vehicle_id.as_deref()).await?;

        let mut history: Vec<StateHistoryEntry> = self.records.list_typed(&order_filter(id)).await?;
        history.sort_by(|a, b| a.changed_at.cmp(&b.changed_at));

        let state = order.current_state();
        Ok(TrackingResponse {
            id: id.to_string(),
            state,
            state_label: state.label(),
            vehicle: vehicle.map(|v| TrackingVehicle {
                plate: v.plate,
                brand: v.brand,
                model: v.model,
            }),
            history: history
                .into_iter()
                .filter_map(|entry| {
                    let state = entry.state?;
                    Some(TrackingEntry {
                        state,
                        state_label: state.label(),
                        changed_at: entry.changed_at,
                    })
                })
                .collect(),
        })
    }

    fn tracking_url(&self, id: &str) -> String {
        format!(
            "{}/tracking/{}",
            self.settings.shop.public_url.trim_end_matches('/'),
            id
        )
    }

    /// Store a history entry and return its id.
    async fn append_history(&self, entry: StateHistoryEntry) -> Result<Option<String>, RecordError> {
        let created = self.records.create(entry).await?;
        Ok(document_id(&created))
    }

    /// Roll back a history entry whose state change did not happen.
    async fn discard_history(&self, order_id: &str, entry_id: Option<&str>) {
        let Some(entry_id) = entry_id else {
            return;
        };
        if let Err(e) = self.records.delete(Collection::StateHistory, entry_id).await {
            tracing::error!(order_id = %order_id, entry_id = %entry_id, error = %e, "Could not remove orphaned history entry");
        }
    }

    /// Referenced record; missing ids and malformed documents count as absent.
    async fn related<T: Document>(&self, id: Option<&str>) -> Result<Option<T>, RecordError> {
        let Some(id) = id else {
            return Ok(None);
        };
        match self.records.find::<T>(id).await {
            Err(RecordError::Store(StoreError::Decode(e))) => {
                tracing::warn!(collection = %T::COLLECTION, id = %id, error = %e, "Ignoring malformed related record");
                Ok(None)
            }
            other => other,
        }
    }

    /// Best effort: failures are logged, never returned.
    async fn notify_state_change(&self, id: &str, order: &Value, state: OrderState) {
        if !self.settings.email.notify_state_changes {
            return;
        }

        let client_id = order.get("clientId").and_then(scalar_to_string);
        let vehicle_id = order.get("vehicleId").and_then(scalar_to_string);

        let client = match self.related::<Client>(client_id.as_deref()).await {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(order_id = %id, error = %e, "Could not load client for notification");
                return;
            }
        };
        let Some(client) = client.filter(|c| c.email.as_deref().is_some_and(|e| !e.trim().is_empty())) else {
            tracing::debug!(order_id = %id, "Client has no email; skipping notification");
            return;
        };
        let vehicle = self
            .related::<Vehicle>(vehicle_id.as_deref())
            .await
            .ok()
            .flatten();

        let message = state_change_email(
            &client,
            vehicle.as_ref(),
            state,
            &self.settings.shop.name,
            &self.tracking_url(id),
        );

        match self.mailer.send(&message).await {
            Ok(message_id) => {
                tracing::info!(order_id = %id, message_id = %message_id, "State change notification sent")
            }
            Err(e) => tracing::warn!(order_id = %id, error = %e, "State change notification failed"),
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// State recorded on a raw order; `None` when it was never set.
fn stored_state(order: &Value) -> Result<Option<OrderState>, serde_json::Error> {
    match order.get("state") {
        None | Some(Value::Null) => Ok(None),
        Some(state) => serde_json::from_value(state.clone()).map(Some),
    }
}

fn order_filter(id: &str) -> Vec<(String, String)> {
    vec![("orderId".to_string(), id.to_string())]
}

fn changed_at(doc: &Value) -> &str {
    doc.get("changedAt").and_then(Value::as_str).unwrap_or_default()
}

/// Collect what the invoice prints; absent client or vehicle shows as N/A.
pub fn build_invoice(
    id: &str,
    order: &ServiceOrder,
    client: Option<&Client>,
    vehicle: Option<&Vehicle>,
) -> InvoiceDocument {
    let field = |value: Option<&String>| value.cloned().unwrap_or_default();
    let quotation = order.quotation.clone().unwrap_or_default();

    InvoiceDocument {
        number: id.to_string(),
        issued_on: Utc::now().format("%Y-%m-%d").to_string(),
        state_label: order.current_state().label().to_string(),
        client_name: client
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        client_phone: field(client.and_then(|c| c.phone.as_ref())),
        client_email: field(client.and_then(|c| c.email.as_ref())),
        client_document: field(client.and_then(|c| c.document.as_ref())),
        vehicle_plate: vehicle
            .and_then(|v| v.plate.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        vehicle_description: vehicle.map(Vehicle::description).unwrap_or_default(),
        lines: quotation
            .items
            .iter()
            .map(|item| InvoiceLine {
                description: item.description.clone().unwrap_or_default(),
                quantity: item.quantity.unwrap_or_default(),
                unit_price: item.unit_price.unwrap_or_default(),
                total: item.line_total(),
            })
            .collect(),
        apply_tax: quotation.apply_tax,
        totals: order.totals(),
        notes: quotation.notes,
    }
}

/// Notification sent to the client when the order moves.
pub fn state_change_email(
    client: &Client,
    vehicle: Option<&Vehicle>,
    state: OrderState,
    shop_name: &str,
    tracking_url: &str,
) -> EmailMessage {
    let plate = vehicle
        .and_then(|v| v.plate.as_deref())
        .unwrap_or("your vehicle");
    let name = client.name.as_deref().unwrap_or("customer");

    let html = format!(
        "<p>Hello {name},</p>\
         <p>The status of {plate} has changed to <strong>{label}</strong>.</p>\
         <p>You can follow its progress at <a href=\"{url}\">{url}</a>.</p>\
         <p>{shop}</p>",
        name = escape_html(name),
        plate = escape_html(plate),
        label = state.label(),
        url = escape_html(tracking_url),
        shop = escape_html(shop_name),
    );

    EmailMessage {
        to: client.email.clone().unwrap_or_default(),
        subject: format!("{}: {} is now {}", shop_name, plate, state.label().to_lowercase()),
        html,
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
