use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::models::User;

/// 基于单个 JSON 文件的用户目录。
///
/// 每次查询整读、每次写入整写；单进程单写者，无并发协调。
#[derive(Clone)]
pub struct UserDirectory {
    path: PathBuf,
}

impl UserDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 读出全部用户。文件不存在视为空目录；
    /// 读取或解析失败时降级为空集并告警（沿用原始行为，见 DESIGN.md）
    pub fn read_all(&self) -> Vec<User> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(users) => users,
                Err(e) => {
                    log::warn!("Users file is not valid JSON, treating as empty: {e}");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read users file, treating as empty: {e}");
                Vec::new()
            }
        }
    }

    /// 线性扫描，用户名或邮箱任一命中即返回
    pub fn find_by_username_or_email(&self, username: &str, email: &str) -> Option<User> {
        self.read_all()
            .into_iter()
            .find(|u| u.email == email || u.username == username)
    }

    /// 读全量、追加、整体重写
    pub fn append(&self, user: User) -> AppResult<()> {
        let mut users = self.read_all();
        users.push(user);
        let raw = serde_json::to_string_pretty(&users)?;
        std::fs::write(&self.path, raw)
            .map_err(|e| AppError::StorageError(format!("failed to write users file: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_directory() -> (UserDirectory, PathBuf) {
        let path = std::env::temp_dir().join(format!("users-{}.json", uuid::Uuid::new_v4()));
        (UserDirectory::new(&path), path)
    }

    fn user(username: &str, email: &str) -> User {
        User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            secret: "secret1".to_string(),
        }
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (dir, _path) = temp_directory();
        assert!(dir.read_all().is_empty());
    }

    #[test]
    fn test_append_then_find() {
        let (dir, path) = temp_directory();
        dir.append(user("bob", "a@x.com")).unwrap();

        assert!(dir.find_by_username_or_email("bob", "other@x.com").is_some());
        assert!(dir.find_by_username_or_email("other", "a@x.com").is_some());
        assert!(dir.find_by_username_or_email("other", "other@x.com").is_none());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_append_preserves_existing_records() {
        let (dir, path) = temp_directory();
        dir.append(user("bob", "a@x.com")).unwrap();
        dir.append(user("alice", "b@x.com")).unwrap();

        let users = dir.read_all();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "bob");
        assert_eq!(users[1].username, "alice");

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let (dir, path) = temp_directory();
        std::fs::write(&path, "not json").unwrap();
        assert!(dir.read_all().is_empty());
        let _ = std::fs::remove_file(path);
    }
}
