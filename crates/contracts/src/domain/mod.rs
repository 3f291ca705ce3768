pub mod a030_order_line;
