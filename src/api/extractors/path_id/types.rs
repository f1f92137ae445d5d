/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 *  - decode ロジック / extractor 実装はここに置かない
 */
use super::core::PathId;

// cart items
pub enum CartItemTag {}
pub type CartItemId = PathId<CartItemTag>;

// products
pub enum ProductTag {}
pub type ProductId = PathId<ProductTag>;
