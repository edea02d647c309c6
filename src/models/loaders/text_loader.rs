use crate::error::InputError;
use crate::models::RawResume;
use std::path::Path;
use tokio::fs;

/// 读取原始简历文本
///
/// 文件按字节读取后做有损 UTF-8 解码，任意编码都不会中断流程。
pub async fn load_raw_resume(path: &Path) -> Result<RawResume, InputError> {
    let path_str = path.display().to_string();

    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(InputError::Missing { path: path_str });
        }
        Err(e) => return Err(InputError::read(path_str, e)),
    };

    let text = String::from_utf8_lossy(&bytes).into_owned();
    let raw = RawResume::new(text).ok_or(InputError::Empty {
        path: path_str.clone(),
    })?;

    tracing::info!("已读取简历: {} ({} 字符)", path_str, raw.text().chars().count());

    Ok(raw)
}
