//! Business record types shown on the dashboard pages.
//!
//! Field names passed to [`Record::field`] are the camelCase JSON names, so
//! a page preset addresses a typed record and its raw JSON form the same way.

use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, Record};

/// An integrated sales channel (store, marketplace, wholesale portal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesChannel {
    pub id: String,
    pub name: String,
    pub platform: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_goal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_status: Option<String>,
    /// SKUs currently out of stock on this channel.
    #[serde(default)]
    pub out_of_stock: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
}

impl Record for SalesChannel {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => (&self.id).into(),
            "name" => (&self.name).into(),
            "platform" => (&self.platform).into(),
            "status" => (&self.status).into(),
            "monthlyRevenue" => self.monthly_revenue.into(),
            "revenueGoal" => self.revenue_goal.into(),
            "healthScore" => self.health_score.into(),
            "integrationStatus" => (&self.integration_status).into(),
            "outOfStock" => self.out_of_stock.as_slice().into(),
            "tags" => self.tags.as_slice().into(),
            "lastSync" => (&self.last_sync).into(),
            _ => FieldValue::Missing,
        }
    }
}

/// A CRM customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_orders: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_order: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Record for Customer {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => (&self.id).into(),
            "name" => (&self.name).into(),
            "email" => (&self.email).into(),
            "company" => (&self.company).into(),
            "status" => (&self.status).into(),
            "segment" => (&self.segment).into(),
            "lifetimeValue" => self.lifetime_value.into(),
            "totalOrders" => self.total_orders.into(),
            "lastOrder" => (&self.last_order).into(),
            "tags" => self.tags.as_slice().into(),
            _ => FieldValue::Missing,
        }
    }
}

/// A deal in the sales pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub title: String,
    pub company: String,
    pub stage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Win probability, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_close: Option<String>,
}

impl Record for Deal {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => (&self.id).into(),
            "title" => (&self.title).into(),
            "company" => (&self.company).into(),
            "stage" => (&self.stage).into(),
            "owner" => (&self.owner).into(),
            "value" => self.value.into(),
            "probability" => self.probability.into(),
            "weightedValue" => match (self.value, self.probability) {
                (Some(v), Some(p)) => (v * p / 100.0).into(),
                _ => FieldValue::Missing,
            },
            "expectedClose" => (&self.expected_close).into(),
            _ => FieldValue::Missing,
        }
    }
}

/// The entity a feedback item is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

/// A piece of customer feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    pub id: String,
    pub source: String,
    #[serde(rename = "type")]
    pub feedback_type: String,
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityRef>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
}

impl Record for FeedbackItem {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => (&self.id).into(),
            "source" => (&self.source).into(),
            "type" => (&self.feedback_type).into(),
            "status" => (&self.status).into(),
            "message" => (&self.message).into(),
            "sentiment" => (&self.sentiment).into(),
            "rating" => self.rating.into(),
            "entity.id" => self
                .entity
                .as_ref()
                .map(|e| FieldValue::from(&e.id))
                .unwrap_or(FieldValue::Missing),
            "entity.type" => self
                .entity
                .as_ref()
                .map(|e| FieldValue::from(&e.entity_type))
                .unwrap_or(FieldValue::Missing),
            "tags" => self.tags.as_slice().into(),
            "createdAt" => (&self.created_at).into(),
            _ => FieldValue::Missing,
        }
    }
}

/// A customer segment with its lifetime-value target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_ltv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ltv_goal: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Record for Segment {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => (&self.id).into(),
            "name" => (&self.name).into(),
            "tier" => (&self.tier).into(),
            "customerCount" => self.customer_count.into(),
            "averageLtv" => self.average_ltv.into(),
            "ltvGoal" => self.ltv_goal.into(),
            "tags" => self.tags.as_slice().into(),
            _ => FieldValue::Missing,
        }
    }
}
