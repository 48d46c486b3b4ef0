use std::{io, net::SocketAddr, sync::Arc};

use tokio::{
	io::{AsyncReadExt, AsyncWriteExt},
	net::{TcpListener, TcpStream},
	task::JoinHandle,
};

/// A TCP server that answers every connection with fixed bytes and then
/// closes it, for responses no well-behaved HTTP server would produce.
pub struct RawHttpServer {
	addr: SocketAddr,
	handle: JoinHandle<()>,
}

impl RawHttpServer {
	pub async fn start(response: impl Into<Vec<u8>>) -> Self {
		let response: Arc<[u8]> = response.into().into();
		let listener = TcpListener::bind("127.0.0.1:0")
			.await
			.expect("bind raw server");
		let addr = listener.local_addr().expect("raw server address");
		let handle = tokio::spawn(async move {
			while let Ok((mut stream, _)) = listener.accept().await {
				let response = response.clone();
				tokio::spawn(async move {
					if let Err(e) = answer(&mut stream, &response).await {
						log::warn!("raw server connection failed: {e}");
					}
				});
			}
		});
		Self { addr, handle }
	}

	pub fn base_url(&self) -> String {
		format!("http://{}", self.addr)
	}
}

impl Drop for RawHttpServer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

async fn answer(stream: &mut TcpStream, response: &[u8]) -> io::Result<()> {
	read_request(stream).await?;
	stream.write_all(response).await?;
	stream.shutdown().await
}

// drains the request so closing the socket does not reset the connection
async fn read_request(stream: &mut TcpStream) -> io::Result<()> {
	let mut buf = Vec::new();
	let mut chunk = [0u8; 1024];
	let head_len = loop {
		if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
			break pos + 4;
		}
		let n = stream.read(&mut chunk).await?;
		if n == 0 {
			return Ok(());
		}
		buf.extend_from_slice(&chunk[..n]);
	};

	let head = String::from_utf8_lossy(&buf[..head_len]);
	let content_length = head
		.lines()
		.filter_map(|line| line.split_once(':'))
		.find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
		.and_then(|(_, value)| value.trim().parse::<usize>().ok())
		.unwrap_or(0);

	while buf.len() < head_len + content_length {
		let n = stream.read(&mut chunk).await?;
		if n == 0 {
			break;
		}
		buf.extend_from_slice(&chunk[..n]);
	}
	Ok(())
}
