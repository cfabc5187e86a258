//! Assignment Portal - 作业上传门户后端服务
//!
//! 基于 Actix Web 构建：学生登录后上传作业压缩包，管理员按条件检索与下载。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `identity`: 外部身份令牌校验
//! - `middlewares`: 认证授权与限流中间件
//! - `models`: 数据模型定义
//! - `object_store`: 对象存储（本地目录 / 内存）
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod identity;
pub mod middlewares;
pub mod models;
pub mod object_store;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
