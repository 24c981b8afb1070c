use async_trait::async_trait;
use booking_ledger::infrastructure::logging;
use tonic::{Request, Response, Status};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    server::{state::StateStore, Context},
    LedgerPeerError,
};

#[async_trait]
/// A type implementing [`Operation`] can process `tonic` requests for a single
/// RPC of the gateway service.
pub(crate) trait Operation<S: StateStore>: Sized + Send + 'static {
    type Request: Send + 'static;
    type Response: Send + 'static;

    /// Core logic for a given operation.
    async fn operation(
        self,
        request: Self::Request,
        context: &Context<S>,
    ) -> Result<Self::Response, LedgerPeerError>;

    /// Takes a request from `tonic` and processes it through the logic
    /// defined by the `Operation::operation` method. Errors are logged and
    /// converted to a sanitized [`Status`] for the client.
    #[instrument(skip_all, err(Debug), fields(request_id, tx_id))]
    async fn handle_request(
        self,
        context: Context<S>,
        request: Request<Self::Request>,
    ) -> Result<Response<Self::Response>, Status> {
        let request_id = Uuid::new_v4();
        logging::record_field("request_id", &request_id);
        info!("Handling new request.");

        let response = self.operation(request.into_inner(), &context).await?;

        info!("Request completed.");
        Ok(Response::new(response))
    }
}
