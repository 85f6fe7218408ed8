// ==========================================
// 卖家API
// ==========================================
// 职责: 卖家登记、查询、列映射维护
// 校验: 列映射必须覆盖全部必填字段，且同一标准字段不得重复映射
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::seller::{NewSeller, Seller, SellerMapping};
use crate::repository::SellerRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::info;

/// 卖家API
pub struct SellerApi {
    seller_repo: Arc<SellerRepository>,
}

impl SellerApi {
    /// 打开数据库并创建 SellerApi
    pub fn new(db_path: &str) -> ApiResult<Self> {
        Ok(Self {
            seller_repo: Arc::new(SellerRepository::new(db_path)?),
        })
    }

    /// 共享已有连接
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            seller_repo: Arc::new(SellerRepository::from_connection(conn)),
        }
    }

    /// 登记卖家
    ///
    /// # 返回
    /// - Ok(Seller): 新建卖家
    /// - Err(InvalidInput): 名称或邮箱为空、邮箱格式错误
    /// - Err(ValidationError): 列映射校验失败
    /// - Err(BusinessRuleViolation): 名称或邮箱已被占用
    pub fn register_seller(&self, seller: NewSeller) -> ApiResult<Seller> {
        let seller = NewSeller {
            name: seller.name.trim().to_string(),
            contact_email: seller.contact_email.trim().to_string(),
            ..seller
        };

        if seller.name.is_empty() {
            return Err(ApiError::InvalidInput("卖家名称不能为空".to_string()));
        }
        validate_email(&seller.contact_email)?;
        seller.csv_mapping.validate()?;

        let created = self.seller_repo.create(&seller)?;
        info!(
            seller_id = created.id,
            name = %created.name,
            mapped_columns = created.csv_mapping.column_map.len(),
            "卖家登记完成"
        );
        Ok(created)
    }

    /// 查询卖家
    pub fn get_seller(&self, seller_id: i64) -> ApiResult<Seller> {
        self.seller_repo
            .find_by_id(seller_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Seller(id={})不存在", seller_id)))
    }

    pub fn list_sellers(&self) -> ApiResult<Vec<Seller>> {
        Ok(self.seller_repo.list_all()?)
    }

    /// 替换卖家列映射（同登记时的校验规则）
    pub fn update_mapping(&self, seller_id: i64, mapping: SellerMapping) -> ApiResult<Seller> {
        mapping.validate()?;
        self.seller_repo.update_mapping(seller_id, &mapping)?;
        info!(seller_id, "卖家列映射已更新");
        self.get_seller(seller_id)
    }
}

fn validate_email(email: &str) -> ApiResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(format!("联系邮箱格式错误: {:?}", email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CanonicalField;
    use std::collections::BTreeMap;

    fn setup() -> SellerApi {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        SellerApi::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn mapping() -> SellerMapping {
        SellerMapping::new(BTreeMap::from([
            ("Part No".to_string(), CanonicalField::ProductId),
            ("Desc".to_string(), CanonicalField::Description),
            ("Size".to_string(), CanonicalField::ThreadSize),
            ("Mat".to_string(), CanonicalField::Material),
            ("Coating".to_string(), CanonicalField::Finish),
            ("Type".to_string(), CanonicalField::Category),
        ]))
    }

    fn new_seller(mapping: SellerMapping) -> NewSeller {
        NewSeller {
            name: " Acme Fasteners ".to_string(),
            contact_email: "ops@acme.test".to_string(),
            phone_number: Some("555-0100".to_string()),
            address: None,
            csv_mapping: mapping,
        }
    }

    #[test]
    fn test_register_and_get() {
        let api = setup();
        let seller = api.register_seller(new_seller(mapping())).unwrap();

        assert_eq!(seller.name, "Acme Fasteners");
        assert_eq!(api.get_seller(seller.id).unwrap(), seller);
        assert_eq!(api.list_sellers().unwrap().len(), 1);
    }

    #[test]
    fn test_register_rejects_incomplete_mapping() {
        let api = setup();
        let mut incomplete = mapping();
        incomplete.column_map.remove("Coating");

        let err = api.register_seller(new_seller(incomplete)).unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(ref msg) if msg.contains("finish")));
        assert!(api.list_sellers().unwrap().is_empty());
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let api = setup();
        let mut seller = new_seller(mapping());
        seller.contact_email = "not-an-email".to_string();

        assert!(matches!(
            api.register_seller(seller),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_register_duplicate_name() {
        let api = setup();
        api.register_seller(new_seller(mapping())).unwrap();

        let mut second = new_seller(mapping());
        second.contact_email = "sales@acme.test".to_string();
        assert!(matches!(
            api.register_seller(second),
            Err(ApiError::BusinessRuleViolation(_))
        ));
    }

    #[test]
    fn test_update_mapping_validates() {
        let api = setup();
        let seller = api.register_seller(new_seller(mapping())).unwrap();

        let mut duplicate = mapping();
        duplicate
            .column_map
            .insert("Desc 2".to_string(), CanonicalField::Description);
        assert!(matches!(
            api.update_mapping(seller.id, duplicate),
            Err(ApiError::ValidationError(_))
        ));

        let mut extended = mapping();
        extended
            .column_map
            .insert("Qty".to_string(), CanonicalField::Quantity);
        let updated = api.update_mapping(seller.id, extended.clone()).unwrap();
        assert_eq!(updated.csv_mapping, extended);

        assert!(matches!(
            api.update_mapping(404, mapping()),
            Err(ApiError::NotFound(_))
        ));
    }
}
