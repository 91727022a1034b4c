use thiserror::Error;

/// 单行处理中可能出现的错误。
///
/// 这些错误都只影响当前行：转换器在行边界捕获、记录日志后继续处理下一行，
/// 不会中断整个批次。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlignError {
    /// 经文引用不符合 `Book C:V` 格式
    #[error("malformed verse reference '{0}'")]
    ReferenceParse(String),

    /// 书卷名不在查找表中
    #[error("unknown book name '{book}' in reference '{reference}'")]
    UnknownBook { book: String, reference: String },

    /// 方括号 / 花括号不配对
    #[error("unbalanced bracket or brace in cell '{0}'")]
    NotationSplit(String),

    /// 预计算的起始索引中找不到该经节（两遍扫描的经节边界不一致）
    #[error("no target start index for verse '{0}'")]
    MissingTargetStartIndex(String),
}

pub type AlignResult<T> = std::result::Result<T, AlignError>;
