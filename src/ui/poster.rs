use gdk_pixbuf::prelude::*;
use gdk_pixbuf::PixbufLoader;
use gtk::prelude::*;
use gtk::{gdk, glib, ContentFit, Picture};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::debug;

use crate::api::MovieApi;

/// Decoded posters kept around for re-renders.
const CACHE_CAPACITY: usize = 200;

/// Downloads posters off the main thread and keeps the decoded textures.
pub struct Posters {
    api: Arc<dyn MovieApi>,
    runtime: Handle,
    cache: Rc<RefCell<Cache<gdk::Texture, glib::WeakRef<Picture>>>>,
}

impl Posters {
    pub fn new(api: Arc<dyn MovieApi>, runtime: Handle) -> Self {
        Posters {
            api,
            runtime,
            cache: Rc::new(RefCell::new(Cache::new(CACHE_CAPACITY))),
        }
    }

    /// A picture that fills itself in once the poster arrives.
    pub fn picture(&self, url: Option<&str>, width: i32, height: i32) -> Picture {
        let picture = Picture::new();
        picture.set_size_request(width, height);
        picture.set_can_shrink(true);
        picture.set_content_fit(ContentFit::Cover);

        let Some(url) = url else {
            return picture;
        };
        if let Some(texture) = self.cache.borrow().get(url) {
            picture.set_paintable(Some(texture));
            return picture;
        }
        if !self.cache.borrow_mut().wait(url, picture.downgrade()) {
            // already on its way
            return picture;
        }

        let api = self.api.clone();
        let owned_url = url.to_string();
        let task = self.runtime.spawn(async move { api.poster(&owned_url).await });

        let cache = self.cache.clone();
        let url = url.to_string();
        glib::spawn_future_local(async move {
            let texture = match task.await {
                Ok(Ok(bytes)) => decode(&bytes).map_err(|e| e.to_string()),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            let texture = match texture {
                Ok(texture) => texture,
                Err(e) => {
                    debug!("poster {} unavailable: {}", url, e);
                    cache.borrow_mut().abandon(&url);
                    return;
                }
            };
            let waiting = cache.borrow_mut().fill(url, texture.clone());
            for picture in waiting.iter().filter_map(glib::WeakRef::upgrade) {
                picture.set_paintable(Some(&texture));
            }
        });

        picture
    }
}

/// Bounded url-keyed store that also remembers who is waiting on a fetch.
///
/// Once full, the oldest entry goes first.
struct Cache<T, W> {
    capacity: usize,
    entries: HashMap<String, T>,
    order: VecDeque<String>,
    pending: HashMap<String, Vec<W>>,
}

impl<T, W> Cache<T, W> {
    fn new(capacity: usize) -> Self {
        Cache {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
            pending: HashMap::new(),
        }
    }

    fn get(&self, url: &str) -> Option<&T> {
        self.entries.get(url)
    }

    /// Queues `waiter` for `url`. True if nobody asked for it before, so the
    /// caller has to start the download.
    fn wait(&mut self, url: &str, waiter: W) -> bool {
        match self.pending.get_mut(url) {
            Some(waiters) => {
                waiters.push(waiter);
                false
            }
            None => {
                self.pending.insert(url.to_string(), vec![waiter]);
                true
            }
        }
    }

    /// Stores a finished download and hands back everyone waiting on it.
    fn fill(&mut self, url: String, value: T) -> Vec<W> {
        let waiting = self.pending.remove(&url).unwrap_or_default();
        if self.entries.insert(url.clone(), value).is_none() {
            self.order.push_back(url);
        }
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        waiting
    }

    fn abandon(&mut self, url: &str) {
        self.pending.remove(url);
    }
}

fn decode(bytes: &[u8]) -> Result<gdk::Texture, glib::Error> {
    let loader = PixbufLoader::new();
    loader.write(bytes)?;
    loader.close()?;
    let pixbuf = loader.pixbuf().ok_or_else(|| {
        glib::Error::new(gdk_pixbuf::PixbufError::CorruptImage, "no image data")
    })?;
    Ok(gdk::Texture::for_pixbuf(&pixbuf))
}
