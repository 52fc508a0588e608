use crate::domain::model::SeedVariant;
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn title(&self) -> &str;
    fn seed(&self) -> SeedVariant;
    fn encoding_label(&self) -> &str;
    fn delimiter(&self) -> &str;
    fn pool_label(&self) -> &str;
    fn machine_prefix(&self) -> &str;
}
