//! The shipping address book, kept only in the session.
//!
//! Addresses are never synced to the backend; the selected one is
//! serialized into the order payload at checkout. Selection is keyed by a
//! stable UUID rather than by list position, so removing an entry can
//! never silently shift which address a checkout is about to use.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A free-form shipping address record.
///
/// Wire field names are camelCase to match the order payload contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl ShippingAddress {
    #[cfg(test)]
    pub(crate) fn sample() -> Self {
        Self {
            id: Uuid::nil(),
            full_name: "Dhanya Kumar".to_string(),
            phone: "9876543210".to_string(),
            street: "12 Canal Road".to_string(),
            city: "Thrissur".to_string(),
            state: "Kerala".to_string(),
            zip: "680001".to_string(),
        }
    }
}

/// Fields submitted by the add/edit address forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressFields {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
}

/// Validation failure for an address form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// A required field was left blank. Name, phone, and street are
    /// required; the rest are free-form.
    #[error("{0} is required")]
    MissingField(&'static str),
}

impl AddressFields {
    /// Required-field validation, run before the address is stored.
    ///
    /// # Errors
    ///
    /// Returns the first missing required field.
    pub fn validate(&self) -> Result<(), AddressError> {
        if self.full_name.trim().is_empty() {
            return Err(AddressError::MissingField("full name"));
        }
        if self.phone.trim().is_empty() {
            return Err(AddressError::MissingField("phone"));
        }
        if self.street.trim().is_empty() {
            return Err(AddressError::MissingField("street"));
        }
        Ok(())
    }
}

/// The session-stored address list plus the current selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressBook {
    addresses: Vec<ShippingAddress>,
    selected: Option<Uuid>,
}

impl AddressBook {
    /// Add a validated address. The first address added becomes the
    /// selection automatically.
    pub fn add(&mut self, fields: AddressFields) -> Uuid {
        let id = Uuid::new_v4();
        self.addresses.push(ShippingAddress {
            id,
            full_name: fields.full_name,
            phone: fields.phone,
            street: fields.street,
            city: fields.city,
            state: fields.state,
            zip: fields.zip,
        });
        if self.selected.is_none() {
            self.selected = Some(id);
        }
        id
    }

    /// Overwrite the fields of an existing address.
    ///
    /// Returns `false` when no address with that id exists.
    pub fn update(&mut self, id: Uuid, fields: AddressFields) -> bool {
        let Some(address) = self.addresses.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        address.full_name = fields.full_name;
        address.phone = fields.phone;
        address.street = fields.street;
        address.city = fields.city;
        address.state = fields.state;
        address.zip = fields.zip;
        true
    }

    /// Remove an address.
    ///
    /// Removing a non-selected address leaves the selection on the same
    /// address. Removing the selected one moves the selection to the
    /// first remaining address, or clears it when none remain.
    pub fn remove(&mut self, id: Uuid) {
        self.addresses.retain(|a| a.id != id);
        if self.selected == Some(id) {
            self.selected = self.addresses.first().map(|a| a.id);
        }
    }

    /// Select an address for checkout.
    ///
    /// Returns `false` when no address with that id exists; the previous
    /// selection is kept in that case.
    pub fn select(&mut self, id: Uuid) -> bool {
        if self.addresses.iter().any(|a| a.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    /// The currently selected address, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&ShippingAddress> {
        let id = self.selected?;
        self.addresses.iter().find(|a| a.id == id)
    }

    /// Whether the given address is the current selection.
    #[must_use]
    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected == Some(id)
    }

    /// Look up an address by id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&ShippingAddress> {
        self.addresses.iter().find(|a| a.id == id)
    }

    /// All addresses, in insertion order.
    #[must_use]
    pub fn addresses(&self) -> &[ShippingAddress] {
        &self.addresses
    }

    /// Whether the book holds no addresses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fields(name: &str) -> AddressFields {
        AddressFields {
            full_name: name.to_string(),
            phone: "9876543210".to_string(),
            street: "12 Canal Road".to_string(),
            city: "Thrissur".to_string(),
            state: "Kerala".to_string(),
            zip: "680001".to_string(),
        }
    }

    #[test]
    fn test_validation_requires_name_phone_street() {
        assert!(fields("Dhanya").validate().is_ok());

        let mut missing_name = fields("");
        missing_name.full_name = String::new();
        assert_eq!(
            missing_name.validate().unwrap_err(),
            AddressError::MissingField("full name")
        );

        let mut missing_street = fields("Dhanya");
        missing_street.street = "  ".to_string();
        assert_eq!(
            missing_street.validate().unwrap_err(),
            AddressError::MissingField("street")
        );
    }

    #[test]
    fn test_first_address_is_auto_selected() {
        let mut book = AddressBook::default();
        let first = book.add(fields("Dhanya"));
        let _second = book.add(fields("Ravi"));
        assert!(book.is_selected(first));
    }

    #[test]
    fn test_removing_earlier_address_keeps_same_selection() {
        // The index-shift defect this book exists to avoid: deleting an
        // entry before the selected one must not move the selection.
        let mut book = AddressBook::default();
        let first = book.add(fields("Dhanya"));
        let second = book.add(fields("Ravi"));
        let third = book.add(fields("Meena"));
        assert!(book.select(second));

        book.remove(first);
        assert!(book.is_selected(second));
        assert_eq!(book.selected().unwrap().full_name, "Ravi");

        book.remove(third);
        assert!(book.is_selected(second));
    }

    #[test]
    fn test_removing_selected_address_falls_back_to_first_remaining() {
        let mut book = AddressBook::default();
        let first = book.add(fields("Dhanya"));
        let second = book.add(fields("Ravi"));
        assert!(book.select(second));

        book.remove(second);
        assert!(book.is_selected(first));
    }

    #[test]
    fn test_removing_last_address_clears_selection() {
        let mut book = AddressBook::default();
        let only = book.add(fields("Dhanya"));
        book.remove(only);
        assert!(book.selected().is_none());
        assert!(book.is_empty());
    }

    #[test]
    fn test_select_unknown_id_keeps_previous_selection() {
        let mut book = AddressBook::default();
        let first = book.add(fields("Dhanya"));
        assert!(!book.select(Uuid::new_v4()));
        assert!(book.is_selected(first));
    }

    #[test]
    fn test_update_overwrites_fields_in_place() {
        let mut book = AddressBook::default();
        let id = book.add(fields("Dhanya"));
        assert!(book.update(id, fields("Dhanya K.")));
        assert_eq!(book.get(id).unwrap().full_name, "Dhanya K.");
        assert!(!book.update(Uuid::new_v4(), fields("Nobody")));
    }

    #[test]
    fn test_wire_form_uses_camel_case() {
        let mut book = AddressBook::default();
        book.add(fields("Dhanya"));
        let json = serde_json::to_string(book.selected().unwrap()).unwrap();
        assert!(json.contains("\"fullName\":\"Dhanya\""));
        assert!(json.contains("\"zip\":\"680001\""));
    }
}
