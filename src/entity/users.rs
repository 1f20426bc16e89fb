use sea_orm::entity::prelude::*;

/// Merchants ("admins"), customers, and the superadmin share this table;
/// `role` discriminates. Merchant-only columns are nullable.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: String,
    pub subdomain: Option<String>,
    pub slug: Option<String>,
    pub store_name: Option<String>,
    pub payout_subaccount_code: Option<String>,
    pub national_id: Option<String>,
    pub bank_name: Option<String>,
    pub bank_code: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub is_active: bool,
    pub payment_status: String,
    pub primary_color: Option<String>,
    pub logo_url: Option<String>,
    pub must_reset_password: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
