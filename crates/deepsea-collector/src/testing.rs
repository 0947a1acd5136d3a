//! Scripted storage API used by the collector tests.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use deepsea_api::{
    ApiError, ApiResult, Links, ListVolumeParams, Meta, Pages, Region, StorageService, Volume,
    VolumePage,
};
use tracing_subscriber::fmt::MakeWriter;

/// What the fake API answers for one page number.
pub(crate) enum PageScript {
    Volumes(Vec<Volume>),
    /// Volumes with a `prev` link that carries no page number.
    BadLinks(Vec<Volume>),
    Fail(u16),
    /// Never answers within any reasonable deadline.
    Hang,
}

pub(crate) struct ScriptedStorage {
    pages: Vec<PageScript>,
    requests: Mutex<Vec<u32>>,
}

impl ScriptedStorage {
    pub(crate) fn new(pages: Vec<PageScript>) -> Self {
        Self {
            pages,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Page numbers requested so far, in order.
    pub(crate) fn requested_pages(&self) -> Vec<u32> {
        self.requests.lock().unwrap().clone()
    }

    fn total_volumes(&self) -> u64 {
        self.pages
            .iter()
            .map(|script| match script {
                PageScript::Volumes(volumes) | PageScript::BadLinks(volumes) => {
                    volumes.len() as u64
                }
                PageScript::Fail(_) | PageScript::Hang => 0,
            })
            .sum()
    }
}

/// Log sink for asserting on emitted events.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub(crate) fn volume(id: &str, name: &str, region: &str, size_gigabytes: i64) -> Volume {
    Volume {
        id: id.to_string(),
        name: name.to_string(),
        region: Some(Region {
            slug: region.to_string(),
            ..Region::default()
        }),
        size_gigabytes,
        ..Volume::default()
    }
}

fn page_link(page: u32) -> String {
    format!("https://api.digitalocean.com/v2/volumes?page={page}&per_page=2")
}

fn links_for(page: u32, total: u32) -> Links {
    Links {
        pages: Some(Pages {
            prev: (page > 1).then(|| page_link(page - 1)),
            next: (page < total).then(|| page_link(page + 1)),
            ..Pages::default()
        }),
    }
}

#[async_trait]
impl StorageService for ScriptedStorage {
    async fn list_volumes(&self, params: &ListVolumeParams) -> ApiResult<VolumePage> {
        let page = params.list_options.page.max(1);
        self.requests.lock().unwrap().push(page);

        let total = self.pages.len() as u32;
        let meta = Some(Meta {
            total: self.total_volumes(),
        });
        let Some(script) = self.pages.get(page as usize - 1) else {
            return Err(ApiError::Response {
                status: 404,
                id: "not_found".to_string(),
                message: format!("no page {page}"),
                request_id: None,
            });
        };

        match script {
            PageScript::Volumes(volumes) => Ok(VolumePage {
                volumes: volumes.clone(),
                links: Some(links_for(page, total)),
                meta,
            }),
            PageScript::BadLinks(volumes) => Ok(VolumePage {
                volumes: volumes.clone(),
                links: Some(Links {
                    pages: Some(Pages {
                        prev: Some("https://api.digitalocean.com/v2/volumes?per_page=2".to_string()),
                        next: Some(page_link(page + 1)),
                        ..Pages::default()
                    }),
                }),
                meta,
            }),
            PageScript::Fail(status) => Err(ApiError::Response {
                status: *status,
                id: "server_error".to_string(),
                message: "Server was unable to give you a response.".to_string(),
                request_id: Some(format!("req-{page}")),
            }),
            PageScript::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ApiError::Decode("unreachable".to_string()))
            }
        }
    }
}
