// ==========================================
// 牛只排放因子计算系统 - 参考数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供参考系数查询接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod in_memory;
pub mod reference_provider;
pub mod sqlite_reference_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use in_memory::InMemoryReferenceProvider;
pub use reference_provider::ReferenceDataProvider;
pub use sqlite_reference_repo::SqliteReferenceRepository;
