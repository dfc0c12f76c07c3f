//! Browser WebSocket transport

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{BinaryType, CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use super::CommandSender;
use crate::config::RemoteConfig;

/// Open socket plus the callbacks it holds; dropping it closes the socket
pub struct RemoteConnection {
    socket: WebSocket,
    _on_open: Closure<dyn FnMut(JsValue)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(ErrorEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl RemoteConnection {
    /// Connect, send the handshake once open, and forward every text
    /// frame into `sender`
    pub fn connect(config: &RemoteConfig, sender: CommandSender) -> Result<Self, JsValue> {
        let socket = WebSocket::new(&config.url)?;
        socket.set_binary_type(BinaryType::Arraybuffer);

        let on_open = {
            let socket = socket.clone();
            let handshake = config.handshake.clone();
            Closure::<dyn FnMut(_)>::new(move |_event: JsValue| {
                log::info!("Remote connected");
                if let Err(e) = socket.send_with_str(&handshake) {
                    log::warn!("Handshake failed: {e:?}");
                }
            })
        };
        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));

        let on_message = Closure::<dyn FnMut(_)>::new(move |event: MessageEvent| {
            match event.data().as_string() {
                Some(text) => sender.deliver(&text),
                None => log::debug!("Ignoring non-text frame"),
            }
        });
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        let on_error = Closure::<dyn FnMut(_)>::new(move |event: ErrorEvent| {
            log::warn!("Remote error: {}", event.message());
        });
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        let on_close = Closure::<dyn FnMut(_)>::new(move |event: CloseEvent| {
            log::warn!("Remote closed (code {})", event.code());
        });
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        log::info!("Connecting to {}", config.url);
        Ok(Self {
            socket,
            _on_open: on_open,
            _on_message: on_message,
            _on_error: on_error,
            _on_close: on_close,
        })
    }
}

impl Drop for RemoteConnection {
    fn drop(&mut self) {
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onerror(None);
        self.socket.set_onclose(None);
        let _ = self.socket.close();
    }
}
