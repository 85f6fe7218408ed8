// ==========================================
// 紧固件目录导入系统 - 目录 Repository Trait
// ==========================================
// 职责: 定义参考实体 / 螺纹规格 / 紧固件 / 挂牌的数据访问接口
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::fastener::{FastenerFields, FastenerRecord, Listing, NamedReference};
use crate::domain::thread_size::{ThreadDescriptor, ThreadSize};
use crate::domain::types::ReferenceKind;
use crate::repository::error::RepositoryResult;

// ==========================================
// CatalogRepository Trait
// ==========================================
// 用途: 导入管道的存储协作方
// 实现者: CatalogRepositoryImpl（使用 rusqlite）
// 约束: 每个方法各自原子；find-or-create 幂等
pub trait CatalogRepository: Send + Sync {
    // ===== 按名称去重的参考实体 =====

    /// 查找或创建材质/表面处理/品类
    ///
    /// # 参数
    /// - kind: 参考实体种类
    /// - name: 已标题化的名称
    ///
    /// # 返回
    /// - Ok(NamedReference): 已存在或新建的记录（并发写入下同名只存一条）
    fn find_or_create_named_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> RepositoryResult<NamedReference>;

    /// 列出某类参考实体（按名称排序）
    fn list_named_references(&self, kind: ReferenceKind) -> RepositoryResult<Vec<NamedReference>>;

    // ===== 螺纹规格 =====

    /// 按 (metric_size_str, imperial_size_str) 查找或创建螺纹规格
    ///
    /// # 参数
    /// - name: 新建时写入的名称（已存在时保留原名称）
    /// - descriptor: 完整描述
    fn find_or_create_thread_size(
        &self,
        name: &str,
        descriptor: &ThreadDescriptor,
    ) -> RepositoryResult<ThreadSize>;

    fn count_thread_sizes(&self) -> RepositoryResult<i64>;

    // ===== 紧固件 =====

    /// 按 product_id 查询紧固件
    fn find_fastener(&self, product_id: &str) -> RepositoryResult<Option<FastenerRecord>>;

    /// 按 product_id 创建或原地更新紧固件
    ///
    /// # 语义
    /// - 已存在: 仅覆盖 fields 中为 Some 的字段，刷新 updated_at
    /// - 不存在: fields 必须齐全，否则返回 ValidationError
    fn upsert_fastener(
        &self,
        product_id: &str,
        fields: &FastenerFields,
    ) -> RepositoryResult<FastenerRecord>;

    fn count_fasteners(&self) -> RepositoryResult<i64>;

    // ===== 挂牌 =====

    /// 按 (seller_id, fastener_id) 创建或更新挂牌（last-write-wins）
    fn upsert_listing(
        &self,
        seller_id: i64,
        fastener_id: i64,
        price: f64,
        quantity: i64,
    ) -> RepositoryResult<Listing>;

    fn find_listing(&self, seller_id: i64, fastener_id: i64) -> RepositoryResult<Option<Listing>>;

    /// 统计卖家挂牌数
    fn count_listings(&self, seller_id: i64) -> RepositoryResult<i64>;
}
