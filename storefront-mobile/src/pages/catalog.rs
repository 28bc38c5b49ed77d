//! Product catalog page for mobile UI

use futures::FutureExt;
use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;

use storefront_common::{Error, RefreshFuture};

use crate::api::{ApiClient, Product};
use crate::components::PullToRefresh;

#[function_component(Catalog)]
pub fn catalog() -> Html {
    let products = use_state(Vec::<Product>::new);
    let loading = use_state(|| true);

    // Fetch products on mount
    {
        let products = products.clone();
        let loading = loading.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match ApiClient::list_products().await {
                    Ok(list) => products.set(list),
                    Err(e) => tracing::warn!("Failed to load products: {}", e),
                }
                loading.set(false);
            });

            || ()
        });
    }

    let on_refresh = {
        let products = products.clone();

        Callback::from(move |_: ()| -> RefreshFuture {
            let products = products.clone();

            async move {
                let list = ApiClient::list_products().await.map_err(Error::RefreshFailed)?;
                products.set(list);
                Ok::<(), Error>(())
            }
            .boxed_local()
        })
    };

    html! {
        <div class="catalog-page" style="display: flex; flex-direction: column; height: 100vh;">
            <header class="page-header">
                <h1>{"Products"}</h1>
            </header>

            <div class="catalog-scroll" style="flex: 1; min-height: 0;">
                <PullToRefresh on_refresh={on_refresh}>
                    <div class="page-content">
                        {if *loading {
                            html! { <div class="loading-container"><div class="spinner"></div></div> }
                        } else if products.is_empty() {
                            html! {
                                <div class="empty-state">
                                    <p>{"No products found"}</p>
                                </div>
                            }
                        } else {
                            products.iter().map(|product| html! {
                                <ProductCard product={product.clone()} />
                            }).collect::<Html>()
                        }}
                    </div>
                </PullToRefresh>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ProductCardProps {
    product: Product,
}

#[function_component(ProductCard)]
fn product_card(props: &ProductCardProps) -> Html {
    let product = &props.product;

    html! {
        <div class="card product-card">
            {if let Some(ref url) = product.image_url {
                html! { <img class="product-image" src={url.clone()} alt={product.name.clone()} /> }
            } else {
                html! {}
            }}
            <div class="card-body">
                <span class="product-name">{&product.name}</span>
                <span class="product-price">{format!("${:.2}", product.price)}</span>
                {if !product.in_stock {
                    html! { <span class="badge badge-muted">{"Out of stock"}</span> }
                } else {
                    html! {}
                }}
            </div>
        </div>
    }
}
