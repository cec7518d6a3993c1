use serde::{Deserialize, Serialize};

use crate::invoice::Party;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Street address; embedded newlines start new lines on the invoice.
    pub address: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
}

impl Customer {
    pub fn to_party(&self) -> Party {
        Party {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone().filter(|e| !e.trim().is_empty()),
            address_lines: self.address.lines().map(str::to_string).collect(),
            district: self.district.clone(),
            state: self.state.clone(),
            pincode: self.pincode.clone(),
        }
    }
}
